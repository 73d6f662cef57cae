use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// The language code that triggers Chinese word segmentation
pub static CHINESE: &str = "ZH";

/// Dataset properties supplied by the challenge harness
///
/// Read-only after construction; validated once here so the rest of the crate
/// can rely on it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metadata {
    language: String,
    train_num: usize,
    test_num: usize,
    class_num: usize,
}

impl Metadata {
    /// Validate and build dataset metadata
    pub fn new(language: &str, train_num: usize, test_num: usize, class_num: usize) -> Result<Self> {
        if language.len() != 2 || !language.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::Configuration(format!(
                "language must be a two-letter uppercase code, got {language:?}"
            )));
        }

        if train_num == 0 {
            return Err(Error::Configuration(
                "train_num must be at least 1".to_string(),
            ));
        }

        if test_num == 0 {
            return Err(Error::Configuration(
                "test_num must be at least 1".to_string(),
            ));
        }

        if class_num < 2 {
            return Err(Error::Configuration(format!(
                "class_num must be at least 2, got {class_num}"
            )));
        }

        Ok(Self {
            language: language.to_string(),
            train_num,
            test_num,
            class_num,
        })
    }

    /// The two-letter language code
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether texts must be word-segmented before vectorization
    pub fn is_chinese(&self) -> bool {
        self.language == CHINESE
    }

    /// Number of training instances
    pub fn train_num(&self) -> usize {
        self.train_num
    }

    /// Number of test instances
    pub fn test_num(&self) -> usize {
        self.test_num
    }

    /// Number of classes
    pub fn class_num(&self) -> usize {
        self.class_num
    }
}
