//! End-to-end rotation of a managed authentication key pool: fill, certify,
//! exhaust by usage, expire by time, and verify the externally observable
//! certification order after each replacement wave.

use std::sync::Arc;

use mdockit_core::credential::{managed_authentication_key_helper, Credential, CredentialStore};
use mdockit_core::secure_area::{CreateKeySettings, EcCurve, KeyPurpose, SoftwareSecureArea};
use mdockit_core::Timestamp;
use mdockit_storage::{EphemeralStorageEngine, StorageEngine};

const DOMAIN: &str = "managedAuthenticationKeys";
const NUM_AUTH_KEYS: usize = 10;
const MAX_USES_PER_KEY: u32 = 5;
const MIN_VALID_TIME_MILLIS: i64 = 10;

fn ts(millis: i64) -> Timestamp {
    Timestamp::from_epoch_millis(millis)
}

fn replenish(
    credential: &mut Credential,
    area: &SoftwareSecureArea,
    settings: &CreateKeySettings,
    now: i64,
) -> usize {
    managed_authentication_key_helper(
        credential,
        area,
        settings,
        DOMAIN,
        ts(now),
        NUM_AUTH_KEYS,
        MAX_USES_PER_KEY,
        MIN_VALID_TIME_MILLIS,
        false,
    )
    .unwrap()
}

/// Certifies every pending key with issuer data `[generation, n]`, in pending
/// order, valid from 100 until `valid_until`.
fn certify_generation(credential: &mut Credential, generation: u8, valid_until: i64) {
    let aliases: Vec<String> = credential
        .pending_keys()
        .iter()
        .map(|k| k.alias().to_string())
        .collect();
    for (n, alias) in aliases.iter().enumerate() {
        credential
            .certify_pending_key(
                alias,
                vec![generation, u8::try_from(n).unwrap()],
                ts(100),
                ts(valid_until),
            )
            .unwrap();
    }
}

fn issuer_data(credential: &Credential) -> Vec<Vec<u8>> {
    credential
        .certified_keys()
        .iter()
        .map(|k| k.issuer_provided_data().to_vec())
        .collect()
}

#[test]
fn managed_key_pool_rotates_in_certification_order() {
    let engine: Arc<dyn StorageEngine> = Arc::new(EphemeralStorageEngine::new());
    let store = CredentialStore::new(Arc::clone(&engine));
    let area = SoftwareSecureArea::new(Arc::clone(&engine));
    let settings =
        CreateKeySettings::new(Vec::new(), vec![KeyPurpose::Sign], EcCurve::P256);

    let mut credential = store.create_credential("testCredential").unwrap();
    assert_eq!(credential.certified_keys().len(), 0);
    assert_eq!(credential.pending_keys().len(), 0);

    // Start the process at time 100 and certify all keys valid until 200.
    assert_eq!(
        replenish(&mut credential, &area, &settings, 100),
        NUM_AUTH_KEYS
    );
    assert_eq!(credential.pending_keys().len(), NUM_AUTH_KEYS);
    for pending in credential.pending_keys() {
        assert!(pending.application_data().get_boolean(DOMAIN).unwrap());
    }
    certify_generation(&mut credential, 0, 200);
    assert_eq!(credential.pending_keys().len(), 0);
    assert_eq!(credential.certified_keys().len(), NUM_AUTH_KEYS);

    // Replenishing again at this point should not make a difference.
    assert_eq!(replenish(&mut credential, &area, &settings, 100), 0);
    assert_eq!(credential.pending_keys().len(), 0);

    // Use up until just before the limit; still no difference.
    let aliases: Vec<String> = credential
        .certified_keys()
        .iter()
        .map(|k| k.alias().to_string())
        .collect();
    for alias in &aliases {
        for _ in 0..MAX_USES_PER_KEY - 1 {
            credential.increase_usage_count(alias).unwrap();
        }
    }
    assert_eq!(replenish(&mut credential, &area, &settings, 100), 0);
    assert_eq!(credential.pending_keys().len(), 0);

    // Push the first five over the limit; replacements are generated for
    // exactly those, expiring a tad later.
    for alias in aliases.iter().take(5) {
        credential.increase_usage_count(alias).unwrap();
    }
    assert_eq!(replenish(&mut credential, &area, &settings, 100), 5);
    assert_eq!(credential.pending_keys().len(), 5);
    for pending in credential.pending_keys() {
        assert_eq!(pending.domain(), DOMAIN);
    }
    certify_generation(&mut credential, 1, 210);
    assert_eq!(credential.pending_keys().len(), 0);
    assert_eq!(credential.certified_keys().len(), NUM_AUTH_KEYS);

    // The untouched half keeps its relative order; the new batch follows in
    // certification order.
    assert_eq!(
        issuer_data(&credential),
        vec![
            vec![0, 5],
            vec![0, 6],
            vec![0, 7],
            vec![0, 8],
            vec![0, 9],
            vec![1, 0],
            vec![1, 1],
            vec![1, 2],
            vec![1, 3],
            vec![1, 4],
        ]
    );

    // Move close to the expiration date of the original batch (5 ms left,
    // inside the 10 ms window); just those are triggered for replacement.
    assert_eq!(replenish(&mut credential, &area, &settings, 195), 5);
    assert_eq!(credential.pending_keys().len(), 5);
    certify_generation(&mut credential, 2, 210);
    assert_eq!(credential.pending_keys().len(), 0);
    assert_eq!(credential.certified_keys().len(), NUM_AUTH_KEYS);

    assert_eq!(
        issuer_data(&credential),
        vec![
            vec![1, 0],
            vec![1, 1],
            vec![1, 2],
            vec![1, 3],
            vec![1, 4],
            vec![2, 0],
            vec![2, 1],
            vec![2, 2],
            vec![2, 3],
            vec![2, 4],
        ]
    );
}

#[test]
fn pool_state_survives_store_reopen_mid_rotation() {
    let engine: Arc<dyn StorageEngine> = Arc::new(EphemeralStorageEngine::new());
    let store = CredentialStore::new(Arc::clone(&engine));
    let area = SoftwareSecureArea::new(Arc::clone(&engine));
    let settings =
        CreateKeySettings::new(Vec::new(), vec![KeyPurpose::Sign], EcCurve::P256);

    let mut credential = store.create_credential("testCredential").unwrap();
    assert_eq!(replenish(&mut credential, &area, &settings, 100), NUM_AUTH_KEYS);
    drop(credential);
    drop(store);

    // A fresh store over the same engine sees the in-flight pending keys and
    // mints nothing further.
    let store = CredentialStore::new(Arc::clone(&engine));
    let mut credential = store.lookup_credential("testCredential").unwrap().unwrap();
    assert_eq!(credential.pending_keys().len(), NUM_AUTH_KEYS);
    assert_eq!(replenish(&mut credential, &area, &settings, 100), 0);

    certify_generation(&mut credential, 0, 200);
    assert_eq!(credential.certified_keys().len(), NUM_AUTH_KEYS);
    assert_eq!(replenish(&mut credential, &area, &settings, 100), 0);
}
