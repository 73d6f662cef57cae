use std::io;

/// Crate-wide error taxonomy
///
/// Every failure in the train/test lifecycle is surfaced to the caller as one
/// of these variants; nothing is retried or swallowed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid metadata or an unusable configuration derived from it
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A persisted artifact is absent, unreadable, or from an incompatible bundle version
    #[error("artifact missing or unreadable at {path}: {reason}")]
    ArtifactMissing {
        /// Path of the offending artifact
        path: String,

        /// Why it could not be used
        reason: String,
    },

    /// An operation received no usable input
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Two shapes that must agree do not
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An underlying filesystem failure, with the path it happened on
    #[error("i/o failure at {path}")]
    Io {
        /// Path of the file being read or written
        path: String,

        /// The underlying failure
        #[source]
        source: io::Error,
    },

    /// A serde serialization or deserialization failure
    #[error("serialization failure: {0}")]
    Serde(#[from] serde_json::Error),

    /// A model record save or load failure
    #[error("record failure: {0}")]
    Record(#[from] burn::record::RecorderError),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach a path to an i/o failure
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build an `ArtifactMissing` for the given path
    pub(crate) fn artifact(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArtifactMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
