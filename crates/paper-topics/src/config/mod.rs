pub mod lexicon;
pub mod settings;

pub use lexicon::{Category, Lexicon, WordList};
pub use settings::{
    NoMarkerFallback, PunctuationPolicy, RankingMode, SegmentationConfig, Settings,
};
