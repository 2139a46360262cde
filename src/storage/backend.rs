//! Key-value storage abstraction.
//!
//! The feed engine only reads local storage to find out who the current user is.
//! [`KeyValueStore`] is the minimal string-to-string interface that lookup needs,
//! with writes available for whoever owns the login flow (and for tests).

use crate::domain::error::Result;

/// Abstraction over persistent string key-value backends.
///
/// # Implementations
///
/// - [`JsonKeyValueStore`](super::JsonKeyValueStore): JSON file with atomic writes
/// - [`MemoryKeyValueStore`](super::MemoryKeyValueStore): process-local map
///
/// # Examples
///
/// ```
/// use notifeed::storage::{KeyValueStore, MemoryKeyValueStore};
///
/// let mut store = MemoryKeyValueStore::default();
/// store.set("userId", "u-1")?;
/// assert_eq!(store.get("userId")?.as_deref(), Some("u-1"));
/// # Ok::<(), notifeed::FeedError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;
}
