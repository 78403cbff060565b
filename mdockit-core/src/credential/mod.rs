//! Credentials and their device authentication key pools.
//!
//! A [`Credential`] represents one logical document instance (e.g. one mDL).
//! It owns an ordered set of certified [`AuthenticationKey`]s, an ordered set
//! of [`PendingAuthenticationKey`]s awaiting issuer sign-off, and an
//! [`ApplicationData`](crate::ApplicationData) annotation store. Credentials
//! are created and looked up through a [`CredentialStore`] and persisted
//! through its storage engine after every mutation.
//!
//! [`managed_authentication_key_helper`] implements the pool replenishment
//! policy on top of this model.

#[allow(clippy::module_inception)]
mod credential;
mod keys;
mod store;
mod util;

pub use credential::Credential;
pub use keys::{AuthenticationKey, PendingAuthenticationKey};
pub use store::CredentialStore;
pub use util::managed_authentication_key_helper;

/// Storage identifier prefix for persisted credential state.
pub(crate) const CREDENTIAL_ID_PREFIX: &str = "mdoc/credential/";
