use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Upper bound on the vocabulary-derived feature count
pub const TOP_K: usize = 20_000;

/// Ceiling on the shared padding length
pub const MAX_SEQUENCE_LENGTH: usize = 200;

/// Characters stripped from text before splitting on whitespace
static FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Vocabulary-based sequence vectorizer
///
/// Fit once on training text; the fitted state (token indices plus the
/// recorded padding length) is the contract between the train and test
/// phases and must survive serialization bit-for-bit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vectorizer {
    word_index: HashMap<String, usize>,
    num_words: usize,
    max_length: usize,
}

impl Vectorizer {
    /// Fit a vocabulary on training text with the default limits
    pub fn fit(texts: &[String]) -> Result<Self> {
        Self::fit_with(texts, TOP_K, MAX_SEQUENCE_LENGTH)
    }

    /// Fit a vocabulary with explicit feature and length ceilings
    ///
    /// Indices are assigned from 1 by descending corpus frequency, ties
    /// broken by first occurrence; 0 is reserved for padding. The recorded
    /// padding length is the longest fitted sequence, capped at `length_cap`.
    pub fn fit_with(texts: &[String], num_words: usize, length_cap: usize) -> Result<Self> {
        if texts.is_empty() {
            return Err(Error::EmptyInput(
                "cannot fit a vectorizer on an empty text list".to_string(),
            ));
        }

        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for text in texts {
            for token in tokenize(text) {
                let next_rank = counts.len();
                let entry = counts.entry(token).or_insert((0, next_rank));
                entry.0 += 1;
            }
        }

        let mut ordered: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ordered.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

        let word_index = ordered
            .into_iter()
            .enumerate()
            .map(|(rank, (token, _))| (token, rank + 1))
            .collect();

        let mut vectorizer = Self {
            word_index,
            num_words,
            max_length: 0,
        };

        let longest = texts
            .iter()
            .map(|text| vectorizer.encode(text).len())
            .max()
            .unwrap_or(0);
        if longest == 0 {
            return Err(Error::EmptyInput(
                "every training example encodes to an empty sequence".to_string(),
            ));
        }

        vectorizer.max_length = longest.min(length_cap);

        Ok(vectorizer)
    }

    /// Convert one text into its integer sequence
    ///
    /// Unknown tokens and tokens whose index falls outside the feature cap
    /// are dropped; there is no OOV token.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        tokenize(text)
            .into_iter()
            .filter_map(|token| self.word_index.get(&token).copied())
            .filter(|&index| index < self.num_words)
            .collect()
    }

    /// Convert a corpus into integer sequences
    pub fn encode_all(&self, texts: &[String]) -> Vec<Vec<usize>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Number of distinct tokens seen during fitting
    pub fn vocab_size(&self) -> usize {
        self.word_index.len()
    }

    /// Embedding input dimension: `min(vocab_size + 1, num_words)`
    pub fn num_features(&self) -> usize {
        (self.word_index.len() + 1).min(self.num_words)
    }

    /// The shared padding length recorded at fit time
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Lowercase, strip filter characters, split on whitespace
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || FILTERS.contains(c))
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
