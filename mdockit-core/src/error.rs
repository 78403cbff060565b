//! Error types for the credential core.

use thiserror::Error;

use crate::secure_area::SecureAreaError;

/// Result type alias for credential core operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors that can occur during credential core operations.
///
/// All failures are returned to the caller as typed results; the core
/// performs no retries and no silent recovery. Each error is scoped to the
/// single operation invoked.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No credential exists under the given name.
    #[error("credential not found: {name}")]
    CredentialNotFound {
        /// The credential name that was looked up.
        name: String,
    },

    /// A credential already exists under the given name.
    #[error("credential already exists: {name}")]
    CredentialAlreadyExists {
        /// The conflicting credential name.
        name: String,
    },

    /// No pending or certified key exists under the given alias.
    #[error("key not found: {alias}")]
    KeyNotFound {
        /// The key alias that was looked up.
        alias: String,
    },

    /// The key is no longer pending; certification is a one-shot operation.
    #[error("key already certified: {alias}")]
    AlreadyCertified {
        /// The alias of the already-certified key.
        alias: String,
    },

    /// A caller-supplied parameter is out of range.
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Description of the issue.
        reason: String,
    },

    /// No application data value is stored under the given key.
    #[error("application data not found: {key}")]
    DataNotFound {
        /// The application data key that was looked up.
        key: String,
    },

    /// The stored application data value has a different kind than requested.
    #[error("application data type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The application data key.
        key: String,
        /// The kind the accessor asked for.
        expected: &'static str,
        /// The kind actually stored.
        found: &'static str,
    },

    /// A secure-area operation failed.
    #[error(transparent)]
    SecureArea(#[from] SecureAreaError),

    /// A storage engine operation failed.
    #[error(transparent)]
    Storage(#[from] mdockit_storage::StorageError),

    /// Credential state could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IdentityError::CredentialAlreadyExists {
            name: "mdl".to_string(),
        };
        assert!(format!("{err}").contains("already exists: mdl"));
        let err = IdentityError::TypeMismatch {
            key: "domain".to_string(),
            expected: "boolean",
            found: "bytes",
        };
        assert!(format!("{err}").contains("expected boolean, found bytes"));
    }
}
