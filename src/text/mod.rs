/// Chinese word segmentation
pub mod chinese;

/// Vocabulary fitting and sequence vectorization
pub mod vectorizer;

pub use vectorizer::Vectorizer;
