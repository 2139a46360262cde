//! Current-user resolution from local storage.
//!
//! Several historical app versions stored the signed-in user differently. The
//! lookup order below is a compatibility shim and must stay exactly as is: the
//! first non-empty hit wins and nothing is merged.
//!
//! 1. JSON blob under [`USER_BLOB_KEY`], reading [`USER_BLOB_ID_FIELDS`] in order
//! 2. Flat strings under [`LEGACY_USER_ID_KEYS`], in order

use crate::domain::notification::id_from_value;
use crate::storage::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;

/// Storage key holding the structured user blob.
pub const USER_BLOB_KEY: &str = "user";

/// Id fields looked up inside the user blob, in priority order.
pub const USER_BLOB_ID_FIELDS: [&str; 4] = ["id", "_id", "userId", "UserID"];

/// Legacy flat keys, in priority order.
pub const LEGACY_USER_ID_KEYS: [&str; 3] = ["userId", "UserID", "user_id"];

/// Resolves the signed-in user's id.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the current user id, or `None` when no source has one.
    ///
    /// Read failures and malformed blobs are logged and treated as misses so that
    /// the next source still gets a chance.
    ///
    /// # Examples
    ///
    /// ```
    /// use notifeed::storage::MemoryKeyValueStore;
    /// use notifeed::IdentityResolver;
    /// use std::sync::Arc;
    ///
    /// let store = MemoryKeyValueStore::with_entries([
    ///     ("user", r#"{"id":"blob-user"}"#),
    ///     ("userId", "legacy-user"),
    /// ]);
    /// let resolver = IdentityResolver::new(Arc::new(store));
    /// assert_eq!(resolver.resolve_user_id().as_deref(), Some("blob-user"));
    /// ```
    #[must_use]
    pub fn resolve_user_id(&self) -> Option<String> {
        let _span = tracing::debug_span!("resolve_user_id").entered();

        if let Some(id) = self.from_blob() {
            tracing::debug!(source = USER_BLOB_KEY, "user id resolved");
            return Some(id);
        }

        let found = LEGACY_USER_ID_KEYS.iter().find_map(|key| {
            self.read(key)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*key, value))
        });

        match found {
            Some((key, id)) => {
                tracing::debug!(source = key, "user id resolved from legacy key");
                Some(id)
            }
            None => {
                tracing::debug!("no user id in local storage");
                None
            }
        }
    }

    fn from_blob(&self) -> Option<String> {
        let raw = self.read(USER_BLOB_KEY)?;
        let blob: Value = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed user blob");
                return None;
            }
        };

        USER_BLOB_ID_FIELDS
            .iter()
            .filter_map(|field| blob.get(*field))
            .filter_map(id_from_value)
            .find(|id| !id.trim().is_empty())
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "failed to read local storage");
            None
        })
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{FeedError, Result};
    use crate::storage::MemoryKeyValueStore;

    fn resolver(entries: &[(&str, &str)]) -> IdentityResolver {
        IdentityResolver::new(Arc::new(MemoryKeyValueStore::with_entries(entries.iter().copied())))
    }

    #[test]
    fn blob_wins_over_legacy_keys() {
        let r = resolver(&[("user", r#"{"_id":"from-blob"}"#), ("userId", "from-legacy")]);
        assert_eq!(r.resolve_user_id().as_deref(), Some("from-blob"));
    }

    #[test]
    fn blob_alias_order_and_numeric_ids() {
        let r = resolver(&[("user", r#"{"userId":"second","_id":42}"#)]);
        assert_eq!(r.resolve_user_id().as_deref(), Some("42"));
    }

    #[test]
    fn blank_ids_are_skipped_in_both_sources() {
        let r = resolver(&[("user", r#"{"id":"  ","_id":"real"}"#)]);
        assert_eq!(r.resolve_user_id().as_deref(), Some("real"));

        let r = resolver(&[("user", r#"{"id":" "}"#), ("userId", "\t"), ("UserID", "legacy")]);
        assert_eq!(r.resolve_user_id().as_deref(), Some("legacy"));
    }

    #[test]
    fn falls_through_to_legacy_keys_in_order() {
        let r = resolver(&[("user", "{not json"), ("UserID", "upper"), ("user_id", "snake")]);
        assert_eq!(r.resolve_user_id().as_deref(), Some("upper"));

        let r = resolver(&[("user", r#"{"name":"no id"}"#), ("userId", ""), ("user_id", "snake")]);
        assert_eq!(r.resolve_user_id().as_deref(), Some("snake"));
    }

    #[test]
    fn nothing_stored() {
        assert_eq!(resolver(&[]).resolve_user_id(), None);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(FeedError::Storage("disk on fire".to_string()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_errors_are_misses() {
        let r = IdentityResolver::new(Arc::new(BrokenStore));
        assert_eq!(r.resolve_user_id(), None);
    }
}
