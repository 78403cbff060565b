//! On-device storage primitives for mdockit.
//!
//! The credential core persists its entities through the [`StorageEngine`]
//! trait and owns no I/O logic itself. Two engines are provided:
//!
//! - [`EphemeralStorageEngine`] — in-memory, for tests and short-lived
//!   holders. Contents are lost when the engine is dropped.
//! - [`DirectoryStorageEngine`] — one file per identifier under a root
//!   directory, with atomic (write-to-temp-then-rename) writes.
//!
//! Identifiers are arbitrary UTF-8 strings chosen by the caller; the stored
//! values are opaque byte blobs. Engines never interpret either.

mod directory;
mod ephemeral;
mod error;

pub use directory::DirectoryStorageEngine;
pub use ephemeral::EphemeralStorageEngine;
pub use error::StorageError;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable blob storage by identifier.
///
/// Implementations must be safe to share across threads; callers that need
/// read-modify-write consistency over multiple calls are responsible for
/// their own serialization.
pub trait StorageEngine: Send + Sync {
    /// Reads the blob stored under `id`.
    ///
    /// Returns `Ok(None)` if no blob exists under that identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn get(&self, id: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Stores `data` under `id`, replacing any existing blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn put(&self, id: &str, data: &[u8]) -> StorageResult<()>;

    /// Deletes the blob stored under `id`.
    ///
    /// Deleting a non-existent identifier is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only for actual medium failures.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// Enumerates all identifiers starting with `prefix`.
    ///
    /// Passing an empty prefix enumerates every identifier. Ordering is
    /// unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn enumerate(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
