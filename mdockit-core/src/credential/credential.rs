//! A single credential and its key-set mutation surface.

use std::fmt;
use std::sync::Arc;

use mdockit_storage::StorageEngine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::keys::{AuthenticationKey, PendingAuthenticationKey};
use super::CREDENTIAL_ID_PREFIX;
use crate::secure_area::{CreateKeySettings, SecureArea};
use crate::{ApplicationData, IdentityError, IdentityResult, Timestamp};

/// The persisted portion of a credential, CBOR-encoded into one blob.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialState {
    application_data: ApplicationData,
    certified_keys: Vec<AuthenticationKey>,
    pending_keys: Vec<PendingAuthenticationKey>,
}

/// One logical document instance and its device authentication keys.
///
/// The credential exclusively owns its key sets: externally only read-only
/// ordered snapshots are visible, and all mutation happens through the
/// methods here, each of which persists the new state before returning.
///
/// `certified_keys` is kept in certification order and `pending_keys` in
/// creation order; both orders are significant to the replenishment policy
/// and externally observable.
pub struct Credential {
    name: String,
    storage: Arc<dyn StorageEngine>,
    application_data: ApplicationData,
    certified_keys: Vec<AuthenticationKey>,
    pending_keys: Vec<PendingAuthenticationKey>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("certified_keys", &self.certified_keys.len())
            .field("pending_keys", &self.pending_keys.len())
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// Creates a brand-new credential and persists its empty state.
    pub(crate) fn create(
        storage: Arc<dyn StorageEngine>,
        name: &str,
    ) -> IdentityResult<Self> {
        let credential = Self {
            name: name.to_string(),
            storage,
            application_data: ApplicationData::new(),
            certified_keys: Vec::new(),
            pending_keys: Vec::new(),
        };
        credential.save()?;
        Ok(credential)
    }

    /// Loads a credential from storage, or `None` if it does not exist.
    pub(crate) fn load(
        storage: Arc<dyn StorageEngine>,
        name: &str,
    ) -> IdentityResult<Option<Self>> {
        let Some(bytes) = storage.get(&storage_id(name))? else {
            return Ok(None);
        };
        let state: CredentialState = ciborium::from_reader(bytes.as_slice())
            .map_err(|e| IdentityError::Serialization(e.to_string()))?;
        Ok(Some(Self {
            name: name.to_string(),
            storage,
            application_data: state.application_data,
            certified_keys: state.certified_keys,
            pending_keys: state.pending_keys,
        }))
    }

    fn save(&self) -> IdentityResult<()> {
        let state = CredentialState {
            application_data: self.application_data.clone(),
            certified_keys: self.certified_keys.clone(),
            pending_keys: self.pending_keys.clone(),
        };
        let mut bytes = Vec::new();
        ciborium::into_writer(&state, &mut bytes)
            .map_err(|e| IdentityError::Serialization(e.to_string()))?;
        self.storage.put(&storage_id(&self.name), &bytes)?;
        Ok(())
    }

    /// Returns this credential's immutable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this credential's annotation store.
    #[must_use]
    pub const fn application_data(&self) -> &ApplicationData {
        &self.application_data
    }

    /// Mutates this credential's annotation store and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn edit_application_data(
        &mut self,
        edit: impl FnOnce(&mut ApplicationData),
    ) -> IdentityResult<()> {
        edit(&mut self.application_data);
        self.save()
    }

    /// Returns the certified keys, in certification order.
    #[must_use]
    pub fn certified_keys(&self) -> &[AuthenticationKey] {
        &self.certified_keys
    }

    /// Returns the pending keys, in creation order.
    #[must_use]
    pub fn pending_keys(&self) -> &[PendingAuthenticationKey] {
        &self.pending_keys
    }

    /// Finds a certified key by alias.
    #[must_use]
    pub fn authentication_key(&self, alias: &str) -> Option<&AuthenticationKey> {
        self.certified_keys.iter().find(|k| k.alias == alias)
    }

    /// Finds a pending key by alias.
    #[must_use]
    pub fn pending_key(&self, alias: &str) -> Option<&PendingAuthenticationKey> {
        self.pending_keys.iter().find(|k| k.alias == alias)
    }

    /// Creates a single pending key in `domain`, optionally slated to replace
    /// the certified key `replacement_for` once certified.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyNotFound`] if `replacement_for` names no
    /// certified key, [`IdentityError::SecureArea`] if key creation fails, or
    /// a storage error if the new state cannot be persisted.
    pub fn create_pending_key(
        &mut self,
        secure_area: &dyn SecureArea,
        settings: &CreateKeySettings,
        domain: &str,
        replacement_for: Option<&str>,
    ) -> IdentityResult<&PendingAuthenticationKey> {
        let replacements = [replacement_for.map(str::to_string)];
        self.add_pending_keys(
            secure_area,
            settings,
            domain,
            &replacements,
            &ApplicationData::new(),
        )?;
        Ok(self
            .pending_keys
            .last()
            .unwrap_or_else(|| unreachable!("batch of one was just appended")))
    }

    /// Mints a batch of pending keys all-or-nothing.
    ///
    /// All secure-area keys are created before any pending record is
    /// appended; on any failure the already-created secure-area keys are
    /// deleted again and the credential is left untouched. Each new key
    /// starts from a clone of `seed_application_data`.
    pub(crate) fn add_pending_keys(
        &mut self,
        secure_area: &dyn SecureArea,
        settings: &CreateKeySettings,
        domain: &str,
        replacements: &[Option<String>],
        seed_application_data: &ApplicationData,
    ) -> IdentityResult<()> {
        for target in replacements.iter().flatten() {
            if self.authentication_key(target).is_none() {
                return Err(IdentityError::KeyNotFound {
                    alias: target.clone(),
                });
            }
        }

        let mut minted = Vec::with_capacity(replacements.len());
        for replacement in replacements {
            let alias = format!("mdoc_auth_key_{}", Uuid::new_v4());
            match secure_area.create_key(&alias, settings) {
                Ok(attestation) => minted.push((alias, attestation, replacement.clone())),
                Err(e) => {
                    // All-or-nothing: undo the partial batch.
                    for (alias, _, _) in &minted {
                        let _ = secure_area.delete_key(alias);
                    }
                    return Err(e.into());
                }
            }
        }

        let prior_len = self.pending_keys.len();
        for (alias, attestation, replacement_for_alias) in minted {
            self.pending_keys.push(PendingAuthenticationKey {
                alias,
                domain: domain.to_string(),
                secure_area_id: secure_area.identifier().to_string(),
                attestation,
                application_data: seed_application_data.clone(),
                replacement_for_alias,
            });
        }
        if let Err(e) = self.save() {
            for key in self.pending_keys.drain(prior_len..) {
                let _ = secure_area.delete_key(&key.alias);
            }
            return Err(e);
        }
        tracing::debug!(
            credential = %self.name,
            domain,
            count = replacements.len(),
            "minted pending authentication keys"
        );
        Ok(())
    }

    /// Certifies the pending key `alias`, promoting it to a certified key.
    ///
    /// The pending key is consumed: it is removed from the pending set and an
    /// [`AuthenticationKey`] with the same alias, domain, and application
    /// data is appended to the tail of the certified set, carrying
    /// `issuer_provided_data` and the given validity window with a usage
    /// count of zero. If the pending key was slated to replace a certified
    /// key, that key is retired in the same step; its secure-area material is
    /// not touched here, so callers that need explicit cleanup should inspect
    /// [`PendingAuthenticationKey::replaces`] before certifying.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidParameter`] if `valid_from` is after
    /// `valid_until`, [`IdentityError::AlreadyCertified`] if `alias` names a
    /// certified key, [`IdentityError::KeyNotFound`] if it names no key at
    /// all, or a storage error if the new state cannot be persisted.
    pub fn certify_pending_key(
        &mut self,
        alias: &str,
        issuer_provided_data: Vec<u8>,
        valid_from: Timestamp,
        valid_until: Timestamp,
    ) -> IdentityResult<&AuthenticationKey> {
        if valid_from > valid_until {
            return Err(IdentityError::InvalidParameter {
                parameter: "valid_from",
                reason: format!("valid_from {valid_from} is after valid_until {valid_until}"),
            });
        }
        let Some(index) = self.pending_keys.iter().position(|k| k.alias == alias) else {
            if self.authentication_key(alias).is_some() {
                return Err(IdentityError::AlreadyCertified {
                    alias: alias.to_string(),
                });
            }
            return Err(IdentityError::KeyNotFound {
                alias: alias.to_string(),
            });
        };

        let pending = self.pending_keys.remove(index);
        if let Some(replaced) = &pending.replacement_for_alias {
            // Atomic swap: the retired key leaves as the new one lands, so
            // the domain population never transiently shrinks or doubles.
            self.certified_keys.retain(|k| &k.alias != replaced);
            tracing::debug!(
                credential = %self.name,
                alias = %replaced,
                replacement = %pending.alias,
                "retired authentication key"
            );
        }
        self.certified_keys.push(AuthenticationKey {
            alias: pending.alias,
            domain: pending.domain,
            secure_area_id: pending.secure_area_id,
            application_data: pending.application_data,
            issuer_provided_data,
            valid_from,
            valid_until,
            usage_count: 0,
        });
        self.save()?;
        Ok(self
            .certified_keys
            .last()
            .unwrap_or_else(|| unreachable!("key was just appended")))
    }

    /// Increments the usage counter of the certified key `alias` and returns
    /// the new count.
    ///
    /// No upper bound is enforced here; the usage limit is consulted solely
    /// by the replenishment helper.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyNotFound`] if `alias` names no certified
    /// key, or a storage error if the new state cannot be persisted.
    pub fn increase_usage_count(&mut self, alias: &str) -> IdentityResult<u32> {
        let key = self
            .certified_keys
            .iter_mut()
            .find(|k| k.alias == alias)
            .ok_or_else(|| IdentityError::KeyNotFound {
                alias: alias.to_string(),
            })?;
        key.usage_count += 1;
        let count = key.usage_count;
        self.save()?;
        Ok(count)
    }

    /// Deletes the pending key `alias`, including its secure-area material.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyNotFound`] if `alias` names no pending
    /// key, or an error from the secure area or storage engine.
    pub fn delete_pending_key(
        &mut self,
        secure_area: &dyn SecureArea,
        alias: &str,
    ) -> IdentityResult<()> {
        let Some(index) = self.pending_keys.iter().position(|k| k.alias == alias) else {
            return Err(IdentityError::KeyNotFound {
                alias: alias.to_string(),
            });
        };
        secure_area.delete_key(alias)?;
        self.pending_keys.remove(index);
        self.save()
    }

    /// Deletes the certified key `alias`, including its secure-area material.
    ///
    /// Any pending key slated to replace the deleted key has its replacement
    /// target cleared and will land as net-new pool growth when certified.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyNotFound`] if `alias` names no certified
    /// key, or an error from the secure area or storage engine.
    pub fn delete_authentication_key(
        &mut self,
        secure_area: &dyn SecureArea,
        alias: &str,
    ) -> IdentityResult<()> {
        let Some(index) = self.certified_keys.iter().position(|k| k.alias == alias) else {
            return Err(IdentityError::KeyNotFound {
                alias: alias.to_string(),
            });
        };
        secure_area.delete_key(alias)?;
        self.certified_keys.remove(index);
        for pending in &mut self.pending_keys {
            if pending.replacement_for_alias.as_deref() == Some(alias) {
                pending.replacement_for_alias = None;
            }
        }
        self.save()
    }

    /// Mutates the annotation store of the key `alias` (pending or
    /// certified) and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyNotFound`] if `alias` names no key, or a
    /// storage error if the new state cannot be persisted.
    pub fn edit_key_application_data(
        &mut self,
        alias: &str,
        edit: impl FnOnce(&mut ApplicationData),
    ) -> IdentityResult<()> {
        if let Some(key) = self.pending_keys.iter_mut().find(|k| k.alias == alias) {
            edit(&mut key.application_data);
        } else if let Some(key) = self.certified_keys.iter_mut().find(|k| k.alias == alias) {
            edit(&mut key.application_data);
        } else {
            return Err(IdentityError::KeyNotFound {
                alias: alias.to_string(),
            });
        }
        self.save()
    }
}

fn storage_id(name: &str) -> String {
    format!("{CREDENTIAL_ID_PREFIX}{name}")
}
