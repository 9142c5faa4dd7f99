pub mod loader;
pub mod parser;

pub use loader::DocumentLoader;
pub use parser::{DocumentParser, ParagraphExtractor, ParsedDocument};
