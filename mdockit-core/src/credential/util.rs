//! Managed replenishment of a credential's authentication key pool.

use std::collections::HashSet;

use super::Credential;
use crate::secure_area::{CreateKeySettings, SecureArea};
use crate::{ApplicationData, IdentityError, IdentityResult, Timestamp};

/// Tops up a credential's pool of usable authentication keys in `domain`.
///
/// The helper maintains the invariant `usable + in-flight pending ≈
/// target_count`. Certified keys in `domain` are classified, in their stored
/// certification order, as *usable* (usage count below `max_uses_per_key` and
/// at least `min_valid_time_millis` of validity remaining at `now`) or
/// *retiring* (exhausted usage, or expiring within that window). The shortfall
/// `target_count - usable - pending-in-domain` is minted as new pending keys:
/// retiring keys are assigned as replacement targets oldest-first, and any
/// remainder beyond the retiring set is minted as net-new pool growth (which
/// only occurs before the pool first reaches `target_count`).
///
/// Each minted key is tagged in its application data with the boolean `true`
/// under the `domain` key, so replacement bookkeeping is self-describing.
/// Minting is all-or-nothing: if the secure area fails partway through, keys
/// created so far are deleted again and no pending record is retained.
///
/// Returns the number of keys minted. With `dry_run` set, the same number is
/// computed and returned but no mutation is performed. Calling again with
/// unchanged inputs and no intervening certification, usage, or passage of
/// time returns `0`.
///
/// Callers must serialize invocations for the same `(credential, domain)`
/// pair; the classification step is not internally synchronized.
///
/// # Errors
///
/// Returns [`IdentityError::InvalidParameter`] if `max_uses_per_key` is zero
/// or `min_valid_time_millis` is negative, [`IdentityError::SecureArea`] if
/// key creation fails, or a storage error if the new state cannot be
/// persisted.
#[allow(clippy::too_many_arguments)]
pub fn managed_authentication_key_helper(
    credential: &mut Credential,
    secure_area: &dyn SecureArea,
    settings: &CreateKeySettings,
    domain: &str,
    now: Timestamp,
    target_count: usize,
    max_uses_per_key: u32,
    min_valid_time_millis: i64,
    dry_run: bool,
) -> IdentityResult<usize> {
    if max_uses_per_key < 1 {
        return Err(IdentityError::InvalidParameter {
            parameter: "max_uses_per_key",
            reason: "must be at least 1".to_string(),
        });
    }
    if min_valid_time_millis < 0 {
        return Err(IdentityError::InvalidParameter {
            parameter: "min_valid_time_millis",
            reason: "must not be negative".to_string(),
        });
    }

    let mut usable = 0usize;
    let mut retiring: Vec<String> = Vec::new();
    for key in credential
        .certified_keys()
        .iter()
        .filter(|k| k.domain() == domain)
    {
        let enough_validity = now.millis_until(key.valid_until()) >= min_valid_time_millis;
        if key.usage_count() < max_uses_per_key && enough_validity {
            usable += 1;
        } else {
            retiring.push(key.alias().to_string());
        }
    }
    let pending_in_domain = credential
        .pending_keys()
        .iter()
        .filter(|k| k.domain() == domain)
        .count();

    let needed = target_count.saturating_sub(usable + pending_in_domain);
    tracing::debug!(
        credential = %credential.name(),
        domain,
        usable,
        retiring = retiring.len(),
        pending = pending_in_domain,
        needed,
        dry_run,
        "classified authentication key pool"
    );
    if needed == 0 || dry_run {
        return Ok(needed);
    }

    // Retiring keys already covered by an in-flight replacement are skipped;
    // the remainder is assigned oldest-first.
    let already_targeted: HashSet<&str> = credential
        .pending_keys()
        .iter()
        .filter_map(super::PendingAuthenticationKey::replaces)
        .collect();
    let mut replacements: Vec<Option<String>> = retiring
        .into_iter()
        .filter(|alias| !already_targeted.contains(alias.as_str()))
        .take(needed)
        .map(Some)
        .collect();
    replacements.resize(needed, None);

    let mut seed = ApplicationData::new();
    seed.set_boolean(domain, true);
    credential.add_pending_keys(secure_area, settings, domain, &replacements, &seed)?;
    Ok(needed)
}
