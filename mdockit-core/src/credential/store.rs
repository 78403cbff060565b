//! A named collection of credentials backed by a storage engine.

use std::fmt;
use std::sync::Arc;

use mdockit_storage::StorageEngine;

use super::{Credential, CREDENTIAL_ID_PREFIX};
use crate::{IdentityError, IdentityResult};

/// Creates, looks up, and deletes [`Credential`]s by unique name.
///
/// The store owns no state of its own beyond the storage engine handle; each
/// returned [`Credential`] is an independent value that persists itself
/// through the same engine. Loading the same credential into two places and
/// mutating both races at the storage layer, so callers must serialize
/// mutations per credential externally.
pub struct CredentialStore {
    storage: Arc<dyn StorageEngine>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a store persisting through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageEngine>) -> Self {
        Self { storage }
    }

    /// Creates a new, empty credential under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::CredentialAlreadyExists`] if `name` is
    /// already taken, or a storage error if the engine fails.
    pub fn create_credential(&self, name: &str) -> IdentityResult<Credential> {
        if Credential::load(Arc::clone(&self.storage), name)?.is_some() {
            return Err(IdentityError::CredentialAlreadyExists {
                name: name.to_string(),
            });
        }
        let credential = Credential::create(Arc::clone(&self.storage), name)?;
        tracing::debug!(credential = name, "created credential");
        Ok(credential)
    }

    /// Looks up the credential under `name`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the engine fails or the persisted state
    /// cannot be decoded.
    pub fn lookup_credential(&self, name: &str) -> IdentityResult<Option<Credential>> {
        Credential::load(Arc::clone(&self.storage), name)
    }

    /// Looks up the credential under `name`, failing if it does not exist.
    ///
    /// Convenience over [`Self::lookup_credential`] for callers that require
    /// the credential to be present.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::CredentialNotFound`] if no credential exists
    /// under `name`, or a storage error if the engine fails.
    pub fn get_credential(&self, name: &str) -> IdentityResult<Credential> {
        self.lookup_credential(name)?
            .ok_or_else(|| IdentityError::CredentialNotFound {
                name: name.to_string(),
            })
    }

    /// Deletes the credential under `name` and all keys it owns.
    ///
    /// Deleting a non-existent credential is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the engine fails.
    pub fn delete_credential(&self, name: &str) -> IdentityResult<()> {
        self.storage
            .delete(&format!("{CREDENTIAL_ID_PREFIX}{name}"))?;
        tracing::debug!(credential = name, "deleted credential");
        Ok(())
    }

    /// Lists the names of all credentials in this store, sorted.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the engine fails.
    pub fn list_credentials(&self) -> IdentityResult<Vec<String>> {
        let mut names: Vec<String> = self
            .storage
            .enumerate(CREDENTIAL_ID_PREFIX)?
            .into_iter()
            .map(|id| id[CREDENTIAL_ID_PREFIX.len()..].to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}
