//! The capability boundary behind which device key material lives.
//!
//! The credential core depends on a [`SecureArea`] to create and delete
//! device authentication keys. Key material is never exposed in plaintext by
//! the core; keys are referenced only by an opaque alias, and creation yields
//! the public material plus an attestation the issuer can verify.
//!
//! Platform integrations (hardware keystores, TEEs, strongboxes) implement
//! this trait; [`SoftwareSecureArea`] is the bundled software-backed
//! implementation used in tests and on platforms without secure hardware.

mod software;

pub use software::SoftwareSecureArea;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during secure-area operations.
#[derive(Debug, Error)]
pub enum SecureAreaError {
    /// The requested curve or purpose set is not supported by this area.
    #[error("unsupported algorithm: {reason}")]
    UnsupportedAlgorithm {
        /// Description of the unsupported request.
        reason: String,
    },

    /// The backing secure hardware could not be reached.
    #[error("secure hardware unavailable: {message}")]
    HardwareUnavailable {
        /// Error message from the platform layer.
        message: String,
    },

    /// No key exists under the given alias in this area.
    #[error("key not found in secure area: {alias}")]
    KeyNotFound {
        /// The alias that was looked up.
        alias: String,
    },

    /// The area's persistent backing store failed.
    #[error(transparent)]
    Storage(#[from] mdockit_storage::StorageError),
}

/// Purposes a created key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPurpose {
    /// Signing, e.g. mdoc ECDSA device authentication.
    Sign,
    /// Key agreement, e.g. mdoc MAC device authentication.
    KeyAgreement,
}

/// Elliptic curves a secure area may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcCurve {
    /// NIST P-256.
    P256,
    /// NIST P-384.
    P384,
    /// Edwards curve Ed25519.
    Ed25519,
}

/// Settings for creating a key in a secure area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateKeySettings {
    /// Challenge the attestation must cover, issuer-chosen.
    pub attestation_challenge: Vec<u8>,
    /// Allowed purposes for the new key.
    pub purposes: Vec<KeyPurpose>,
    /// Curve of the new key.
    pub curve: EcCurve,
}

impl CreateKeySettings {
    /// Creates settings for a key with the given challenge, purposes, and
    /// curve.
    #[must_use]
    pub const fn new(
        attestation_challenge: Vec<u8>,
        purposes: Vec<KeyPurpose>,
        curve: EcCurve,
    ) -> Self {
        Self {
            attestation_challenge,
            purposes,
            curve,
        }
    }
}

/// The public half of a created key, plus its attestation.
///
/// The attestation statement is opaque to the core; its format is defined by
/// the secure area producing it and consumed by the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttestation {
    /// Encoded public key material.
    pub public_key: Vec<u8>,
    /// Opaque attestation statement covering the key and the challenge.
    pub statement: Vec<u8>,
}

/// A secure enclave that creates and holds device authentication keys.
///
/// Implementations must be safe to share across threads. Creation is
/// synchronous; any blocking happens inside the implementation.
pub trait SecureArea: Send + Sync {
    /// Returns a stable identifier for this area, recorded on every key so
    /// the holding area can be found again after a restart.
    fn identifier(&self) -> &str;

    /// Creates a key under `alias` and returns its public material and
    /// attestation.
    ///
    /// # Errors
    ///
    /// Returns [`SecureAreaError::UnsupportedAlgorithm`] if the settings ask
    /// for something this area cannot do, or
    /// [`SecureAreaError::HardwareUnavailable`] if the backing hardware
    /// cannot be reached.
    fn create_key(
        &self,
        alias: &str,
        settings: &CreateKeySettings,
    ) -> Result<KeyAttestation, SecureAreaError>;

    /// Deletes the key under `alias`.
    ///
    /// Deleting a non-existent alias is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium fails.
    fn delete_key(&self, alias: &str) -> Result<(), SecureAreaError>;
}
