//! Credential and key-lifecycle core for mdoc holders.
//!
//! This crate manages, per logical credential, a rotating pool of device
//! authentication keys that are periodically certified by an issuer, consumed
//! by presentation transactions, and retired on usage-limit or expiry
//! grounds.
//!
//! # Architecture
//!
//! - [`credential::CredentialStore`] — a named collection of credentials,
//!   persisted through a [`mdockit_storage::StorageEngine`].
//! - [`credential::Credential`] — owns the certified and pending key sets for
//!   one logical document instance, plus its [`ApplicationData`].
//! - [`credential::managed_authentication_key_helper`] — the pool
//!   replenishment policy: given a target pool size and usage/expiry limits,
//!   decides how many pending keys to mint and which certified keys they
//!   replace.
//! - [`secure_area`] — the capability boundary behind which device key
//!   material lives. The core only ever references keys by opaque alias.
//!
//! # Concurrency
//!
//! The core is single-threaded-per-credential: every mutation goes through
//! `&mut Credential`, and the store performs no cross-process locking.
//! Callers that load the same credential into multiple places must serialize
//! mutations for a given `(credential, domain)` pair externally. All
//! time-dependent decisions take an explicit [`Timestamp`], never the system
//! clock, so runs are deterministic and replayable.

mod application_data;
pub mod credential;
mod error;
pub mod secure_area;
mod time;

pub use application_data::{ApplicationData, DataValue};
pub use error::{IdentityError, IdentityResult};
pub use time::Timestamp;
