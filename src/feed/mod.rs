//! Presentation-side feed state.
//!
//! [`Feed`] bundles the [`FeedStore`] with the [`AnimationRegistry`] that belongs
//! to it. Both live exactly as long as the feed; clones share the same state.
//!
//! # Modules
//!
//! - [`store`]: ordered records, lifecycle phases, loading flags
//! - [`animation`]: per-row animation state, tweens and timings
//! - [`viewmodel`]: render snapshot of the feed

pub mod animation;
pub mod store;
pub mod viewmodel;

pub use animation::{AnimationRegistry, AnimationState};
pub use store::{FeedEntry, FeedStore, Phase, PullKind};
pub use viewmodel::{FeedItemView, FeedViewModel};

use std::sync::{Arc, Mutex, PoisonError};

/// Shared handle to one feed and its animation registry.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    store: Arc<Mutex<FeedStore>>,
    animations: Arc<AnimationRegistry>,
}

impl Feed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the store.
    ///
    /// Keep `f` short and synchronous; the lock is a plain mutex.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut FeedStore) -> R) -> R {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Clone of the current store contents.
    #[must_use]
    pub fn snapshot(&self) -> FeedStore {
        self.with_store(|store| store.clone())
    }

    #[must_use]
    pub fn animations(&self) -> &AnimationRegistry {
        &self.animations
    }

    pub(crate) fn animations_handle(&self) -> Arc<AnimationRegistry> {
        Arc::clone(&self.animations)
    }
}
