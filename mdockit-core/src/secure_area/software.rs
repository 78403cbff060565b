//! Software-backed secure area.
//!
//! This implementation holds key records in a [`StorageEngine`] with no
//! hardware protection. It is suitable for tests and for platforms without a
//! hardware keystore; deployments with real security requirements should
//! provide a hardware-backed [`SecureArea`] instead.
//!
//! Key generation and attestation mechanics live outside the credential core,
//! so this area mints opaque stand-in public-key material: unique random
//! bytes per key, echoed alongside the attestation challenge. The core and
//! its tests only ever treat both as opaque blobs.

use std::sync::Arc;

use mdockit_storage::StorageEngine;
use rand::RngCore;

use super::{CreateKeySettings, EcCurve, KeyAttestation, SecureArea, SecureAreaError};

/// Storage identifier prefix for key records owned by this area.
const KEY_ID_PREFIX: &str = "mdoc/securearea/software/";

/// A [`SecureArea`] backed by ordinary storage, with no hardware protection.
pub struct SoftwareSecureArea {
    storage: Arc<dyn StorageEngine>,
}

impl SoftwareSecureArea {
    /// Creates a software secure area persisting its keys through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageEngine>) -> Self {
        Self { storage }
    }

    fn storage_id(alias: &str) -> String {
        format!("{KEY_ID_PREFIX}{alias}")
    }
}

impl SecureArea for SoftwareSecureArea {
    fn identifier(&self) -> &str {
        "software"
    }

    fn create_key(
        &self,
        alias: &str,
        settings: &CreateKeySettings,
    ) -> Result<KeyAttestation, SecureAreaError> {
        match settings.curve {
            EcCurve::P256 | EcCurve::P384 => {}
            EcCurve::Ed25519 => {
                return Err(SecureAreaError::UnsupportedAlgorithm {
                    reason: "software area only supports NIST curves".to_string(),
                })
            }
        }
        if settings.purposes.is_empty() {
            return Err(SecureAreaError::UnsupportedAlgorithm {
                reason: "key must have at least one purpose".to_string(),
            });
        }

        let mut public_key = vec![0u8; 65];
        rand::thread_rng().fill_bytes(&mut public_key);

        // The stand-in attestation binds the challenge to the public key.
        let mut statement = settings.attestation_challenge.clone();
        statement.extend_from_slice(&public_key);

        self.storage.put(&Self::storage_id(alias), &public_key)?;
        Ok(KeyAttestation {
            public_key,
            statement,
        })
    }

    fn delete_key(&self, alias: &str) -> Result<(), SecureAreaError> {
        self.storage.delete(&Self::storage_id(alias))?;
        Ok(())
    }
}
