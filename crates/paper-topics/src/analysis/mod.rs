pub mod aggregator;
pub mod frequency;
pub mod normalizer;
pub mod ranker;
pub mod segmenter;
pub mod tagger;
pub mod vectorizer;

pub use aggregator::Aggregator;
pub use frequency::{most_common, WordCount};
pub use normalizer::TextNormalizer;
pub use ranker::{TermRanker, TermScore};
pub use segmenter::{QuestionSegmenter, QuestionSpan};
pub use tagger::RuleTagger;
pub use vectorizer::TfidfVectorizer;
