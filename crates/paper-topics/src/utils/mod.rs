pub mod error;
pub mod logger;
pub mod metrics;

pub use error::AnalyzerError;
pub use metrics::{Metrics, Timer};
