//! Error types for flylab-data
//!
//! Structural problems (duplicate ids, missing file, no fly selected) are
//! recoverable: the caller is told and nothing was written. Storage failures
//! are fatal and propagate unchanged.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// flylab-data error types
#[derive(Error, Debug)]
pub enum Error {
    /// A node or file with this name is already present
    #[error("{what} already exists: {name}")]
    AlreadyExists {
        /// Kind of thing that collided ("experiment file", "fly", "node", ...)
        what: &'static str,
        /// Name or path that collided
        name: String,
    },

    /// Referenced file or node does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lifecycle ordering was not respected (no file, no fly, no series)
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Malformed caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (disk, permissions, held lock)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Experiment file could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Experiment file has an unknown format tag or version
    #[error("Unsupported experiment file format: {0}")]
    UnsupportedFormat(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the session can carry on after reporting this error.
    ///
    /// Recoverable errors never leave a partial write behind.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. }
                | Self::NotFound(_)
                | Self::PreconditionViolation(_)
                | Self::InvalidInput(_)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
