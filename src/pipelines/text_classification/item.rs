use derive_new::new;
use serde::{Deserialize, Serialize};

/// One training example: pre-segmented text plus its class index
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// The text for classification, already segmented where applicable
    pub text: String,

    /// The class index of the text
    pub label: usize,
}
