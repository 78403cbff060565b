//! Pending and certified authentication key records.

use serde::{Deserialize, Serialize};

use crate::secure_area::KeyAttestation;
use crate::{ApplicationData, Timestamp};

/// A device authentication key awaiting issuer certification.
///
/// Pending keys are minted by the replenishment helper (or directly via
/// [`Credential::create_pending_key`](super::Credential::create_pending_key))
/// and consumed exactly once by
/// [`Credential::certify_pending_key`](super::Credential::certify_pending_key),
/// after which they cease to exist as pending entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthenticationKey {
    pub(crate) alias: String,
    pub(crate) domain: String,
    pub(crate) secure_area_id: String,
    pub(crate) attestation: KeyAttestation,
    pub(crate) application_data: ApplicationData,
    pub(crate) replacement_for_alias: Option<String>,
}

impl PendingAuthenticationKey {
    /// Returns the opaque alias referencing this key in its secure area.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the caller-defined domain this key is grouped under.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the identifier of the secure area holding this key's material.
    #[must_use]
    pub fn secure_area_id(&self) -> &str {
        &self.secure_area_id
    }

    /// Returns the public material and attestation produced at creation,
    /// to be forwarded to the issuer in the certification request.
    #[must_use]
    pub const fn attestation(&self) -> &KeyAttestation {
        &self.attestation
    }

    /// Returns this key's annotation store.
    #[must_use]
    pub const fn application_data(&self) -> &ApplicationData {
        &self.application_data
    }

    /// Returns the alias of the certified key this one is slated to replace,
    /// or `None` for net-new pool growth.
    #[must_use]
    pub fn replaces(&self) -> Option<&str> {
        self.replacement_for_alias.as_deref()
    }
}

/// A certified, usable device authentication key.
///
/// Created by certifying a [`PendingAuthenticationKey`]; destroyed when the
/// caller deletes it or when a replacement's certification completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationKey {
    pub(crate) alias: String,
    pub(crate) domain: String,
    pub(crate) secure_area_id: String,
    pub(crate) application_data: ApplicationData,
    pub(crate) issuer_provided_data: Vec<u8>,
    pub(crate) valid_from: Timestamp,
    pub(crate) valid_until: Timestamp,
    pub(crate) usage_count: u32,
}

impl AuthenticationKey {
    /// Returns the opaque alias referencing this key in its secure area.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the caller-defined domain this key is grouped under.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the identifier of the secure area holding this key's material.
    #[must_use]
    pub fn secure_area_id(&self) -> &str {
        &self.secure_area_id
    }

    /// Returns this key's annotation store.
    #[must_use]
    pub const fn application_data(&self) -> &ApplicationData {
        &self.application_data
    }

    /// Returns the opaque bytes the issuer attached at certification
    /// (typically the mobile security object endorsing the key).
    #[must_use]
    pub fn issuer_provided_data(&self) -> &[u8] {
        &self.issuer_provided_data
    }

    /// Returns the start of this key's validity window.
    #[must_use]
    pub const fn valid_from(&self) -> Timestamp {
        self.valid_from
    }

    /// Returns the end of this key's validity window.
    #[must_use]
    pub const fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    /// Returns how many presentations have consumed this key.
    ///
    /// The counter only ever increases; no upper bound is enforced here, the
    /// usage limit is consulted solely by the replenishment helper.
    #[must_use]
    pub const fn usage_count(&self) -> u32 {
        self.usage_count
    }
}
