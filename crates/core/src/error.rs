//! Error types for Model Spec tagging
//!
//! Every fallible operation in the workspace returns [`Result`]. Each variant
//! carries enough context (file path or field name) to report exactly what
//! went wrong. We use `thiserror` for the `Display` and `Error` impls.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for Model Spec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Model Spec operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed container or malformed thumbnail data URI
    #[error("Format error: {0}")]
    Format(String),

    /// Unparseable user-supplied value
    #[error("Invalid input for '{field}': {reason}")]
    Input {
        /// Parameter that failed to parse
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// Image codec failure while producing a thumbnail
    #[error("Thumbnail error for '{}': {reason}", path.display())]
    Thumbnail {
        /// Image that could not be encoded
        path: PathBuf,
        /// Codec message
        reason: String,
    },

    /// Filesystem read/write failure
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Build a [`Error::Format`] from any message.
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// Build an [`Error::Input`] for the named field.
    pub fn input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Input {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::Thumbnail`] for the given image path.
    pub fn thumbnail(path: &Path, reason: impl ToString) -> Self {
        Error::Thumbnail {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`Error::Io`] for the given path.
    pub fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns `true` for malformed-data errors.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// Returns `true` for rejected user input.
    pub fn is_input(&self) -> bool {
        matches!(self, Error::Input { .. })
    }
}
