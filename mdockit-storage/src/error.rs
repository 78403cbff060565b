//! Error types for storage engines.

use thiserror::Error;

/// Errors that can occur during storage engine operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O operation failed.
    #[error("I/O error during {context}: {source}")]
    Io {
        /// Context describing the operation.
        context: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A stored identifier could not be decoded during enumeration.
    ///
    /// Raised when a foreign or corrupted entry is found in the backing
    /// medium (e.g. a file whose name is not valid hex).
    #[error("invalid stored identifier: {name}")]
    InvalidId {
        /// The undecodable entry name.
        name: String,
    },

    /// An internal invariant was violated.
    #[error("internal storage error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

impl StorageError {
    /// Creates an I/O error with context.
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
