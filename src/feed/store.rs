//! Ordered, mutable notification feed.
//!
//! [`FeedStore`] holds the records currently on screen, each tagged with its
//! lifecycle [`Phase`], plus the loading flags the list header reads. It is plain
//! synchronous data; the async flows in [`crate::app`] lock it briefly and never
//! across an await point.

use crate::domain::{Envelope, NotificationRecord};
use std::collections::HashSet;

/// Lifecycle of one notification on screen.
///
/// `Visible → Removing → Removed`. `Removed` is never stored: a record in that
/// phase is simply absent from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    /// Exit animation running; the record stays until it finishes.
    Removing,
    Removed,
}

/// A record plus its lifecycle phase.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub record: NotificationRecord,
    pub phase: Phase,
}

impl FeedEntry {
    const fn visible(record: NotificationRecord) -> Self {
        Self {
            record,
            phase: Phase::Visible,
        }
    }
}

/// What kind of pull is in flight. The two kinds drive separate indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullKind {
    /// Screen focus or reconciliation: full loading state.
    Initial,
    /// Pull-to-refresh: small refresh indicator only.
    Refresh,
}

/// The notification feed, most recent first.
#[derive(Debug, Clone, Default)]
pub struct FeedStore {
    entries: Vec<FeedEntry>,
    loads_in_flight: usize,
    refreshes_in_flight: usize,
    reflow_generation: u64,
}

impl FeedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole feed with `payload`, keeping server order.
    ///
    /// Later duplicates of an id are dropped so the feed holds at most one record
    /// per id. Returns the new length.
    pub fn replace(&mut self, payload: Envelope<NotificationRecord>) -> usize {
        let mut seen = HashSet::new();
        let records = payload.into_items();
        let received = records.len();

        self.entries = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .map(FeedEntry::visible)
            .collect();

        if self.entries.len() != received {
            tracing::debug!(
                received,
                kept = self.entries.len(),
                "dropped duplicate notification ids from server payload"
            );
        }
        self.entries.len()
    }

    /// Inserts `record` at the head of the feed.
    ///
    /// No deduplication against existing ids: a push for an id that is already
    /// listed yields two rows until the next pull replaces the feed.
    pub fn prepend(&mut self, record: NotificationRecord) {
        self.entries.insert(0, FeedEntry::visible(record));
    }

    /// Deletes the record with `id`. Returns `false` (and does nothing) if absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use notifeed::feed::FeedStore;
    /// use notifeed::NotificationRecord;
    ///
    /// let mut store = FeedStore::new();
    /// store.prepend(NotificationRecord::new("a", "t", "m"));
    /// assert!(store.remove("a"));
    /// assert!(!store.remove("a"));
    /// assert!(store.is_empty());
    /// ```
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.record.id != id);
        before != self.entries.len()
    }

    /// Removes `id` as part of an animated layout change: the remaining rows are
    /// expected to re-flow with their own transition. See [`Self::reflow_generation`].
    pub fn remove_with_reflow(&mut self, id: &str) -> bool {
        let removed = self.remove(id);
        if removed {
            self.reflow_generation = self.reflow_generation.wrapping_add(1);
        }
        removed
    }

    /// Empties the feed.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Moves `id` from `Visible` to `Removing`.
    ///
    /// Returns `false` if the record is missing or already leaving.
    pub fn begin_removal(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.record.id == id) {
            Some(entry) if entry.phase == Phase::Visible => {
                entry.phase = Phase::Removing;
                true
            }
            _ => false,
        }
    }

    /// Marks every current record as `Removing` and returns their ids in feed
    /// order. Records prepended afterwards are not part of the snapshot.
    pub fn begin_removal_all(&mut self) -> Vec<String> {
        self.entries
            .iter_mut()
            .map(|entry| {
                entry.phase = Phase::Removing;
                entry.record.id.clone()
            })
            .collect()
    }

    /// Phase of `id`; absent records report [`Phase::Removed`].
    #[must_use]
    pub fn phase(&self, id: &str) -> Phase {
        self.get(id).map_or(Phase::Removed, |entry| entry.phase)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FeedEntry> {
        self.entries.iter().find(|entry| entry.record.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    /// Ids in feed order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.record.id.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records that a pull of `kind` started.
    pub fn begin_pull(&mut self, kind: PullKind) {
        match kind {
            PullKind::Initial => self.loads_in_flight += 1,
            PullKind::Refresh => self.refreshes_in_flight += 1,
        }
    }

    /// Records that a pull of `kind` finished, successfully or not.
    pub fn end_pull(&mut self, kind: PullKind) {
        match kind {
            PullKind::Initial => self.loads_in_flight = self.loads_in_flight.saturating_sub(1),
            PullKind::Refresh => self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1),
        }
    }

    /// Whether a full load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    /// Whether a pull-to-refresh is in flight.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    /// Counter bumped by every [`Self::remove_with_reflow`]; the list animates
    /// its layout whenever it observes a new value.
    #[must_use]
    pub const fn reflow_generation(&self) -> u64 {
        self.reflow_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> NotificationRecord {
        NotificationRecord::new(id, format!("title {id}"), "message")
    }

    #[test]
    fn replace_keeps_order_and_drops_duplicates() {
        let mut store = FeedStore::new();
        store.prepend(record("old"));

        let kept = store.replace(Envelope::Wrapped {
            data: vec![record("3"), record("2"), record("3"), record("1")],
        });

        assert_eq!(kept, 3);
        assert_eq!(store.ids(), ["3", "2", "1"]);
    }

    #[test]
    fn prepend_is_newest_first() {
        let mut store = FeedStore::new();
        for id in ["a", "b", "c"] {
            store.prepend(record(id));
        }
        assert_eq!(store.ids(), ["c", "b", "a"]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = FeedStore::new();
        store.replace(vec![record("a"), record("b")].into());

        assert!(store.remove_with_reflow("a"));
        let generation = store.reflow_generation();
        assert!(!store.remove_with_reflow("a"));
        assert!(!store.remove("a"));

        assert_eq!(store.reflow_generation(), generation);
        assert_eq!(store.ids(), ["b"]);
    }

    #[test]
    fn phases() {
        let mut store = FeedStore::new();
        store.prepend(record("a"));

        assert_eq!(store.phase("a"), Phase::Visible);
        assert!(store.begin_removal("a"));
        assert!(!store.begin_removal("a"));
        assert_eq!(store.phase("a"), Phase::Removing);
        store.remove("a");
        assert_eq!(store.phase("a"), Phase::Removed);
        assert!(!store.begin_removal("a"));
    }

    #[test]
    fn loading_and_refreshing_are_independent() {
        let mut store = FeedStore::new();

        store.begin_pull(PullKind::Initial);
        assert!(store.is_loading());
        assert!(!store.is_refreshing());

        store.begin_pull(PullKind::Refresh);
        store.end_pull(PullKind::Initial);
        assert!(!store.is_loading());
        assert!(store.is_refreshing());

        store.end_pull(PullKind::Refresh);
        store.end_pull(PullKind::Refresh);
        assert!(!store.is_refreshing());
    }
}
