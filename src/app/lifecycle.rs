//! Removing notifications: single mark-read and batch clear-all.
//!
//! Both flows acknowledge to the server and animate rows out, but in opposite
//! orders. A single close waits for the server first and only animates on
//! success, so a failed request leaves the row exactly as it was. Clear-all
//! animates first and treats the server call as best effort, then reloads to
//! reconcile with whatever the server actually holds.

use super::controller::FeedController;
use crate::feed::animation::{run_exit, CLEAR_STAGGER};
use crate::feed::{FeedStore, Phase, PullKind};
use futures_util::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of closing a single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// Acknowledged, animated out and removed.
    Removed,
    /// Already animating out; the request was ignored.
    AlreadyRemoving,
    /// Not in the feed.
    NotFound,
    /// No signed-in user to acknowledge as.
    NoUser,
    /// The server rejected or never answered; nothing changed on screen.
    Failed,
}

/// Result of a clear-all request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearAllOutcome {
    /// Another clear-all was still running; this one did nothing.
    AlreadyRunning,
    /// Every listed row was animated out and the feed reloaded.
    Cleared { removed: usize, acknowledged: bool },
}

/// Holds the clear-all flag for as long as the batch runs.
struct ClearGuard<'a>(&'a AtomicBool);

impl<'a> ClearGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ClearGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FeedController {
    /// Marks one notification read and removes it from the feed.
    ///
    /// The server is told first. Only once it confirms does the row enter
    /// [`Phase::Removing`], run its exit animation and disappear; the remaining
    /// rows then re-flow.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn mark_read(&self, id: &str) -> MarkReadOutcome {
        let feed = &self.inner.feed;
        match feed.with_store(|s| s.phase(id)) {
            Phase::Visible => {}
            Phase::Removing => return MarkReadOutcome::AlreadyRemoving,
            Phase::Removed => return MarkReadOutcome::NotFound,
        }

        let Some(user_id) = self.inner.identity.resolve_user_id() else {
            tracing::warn!("cannot mark notification read: no signed-in user");
            return MarkReadOutcome::NoUser;
        };

        if let Err(e) = self.inner.service.mark_read(id, &user_id).await {
            tracing::warn!(error = %e, "failed to mark notification read");
            return MarkReadOutcome::Failed;
        }

        // The feed may have been replaced or cleared while the request was out.
        if !feed.with_store(|s| s.begin_removal(id)) {
            return match feed.with_store(|s| s.phase(id)) {
                Phase::Removed => MarkReadOutcome::NotFound,
                _ => MarkReadOutcome::AlreadyRemoving,
            };
        }

        run_exit(feed.animations(), id).await;
        feed.with_store(|s| s.remove_with_reflow(id));
        tracing::debug!("notification removed");
        MarkReadOutcome::Removed
    }

    /// Animates every row out with an [`CLEAR_STAGGER`] step between starts, tells
    /// the server, then empties the feed and reloads it.
    ///
    /// The server call waits for the last animation to finish. Its failure does
    /// not stop the local clear; the reload brings back whatever survived. Only
    /// one clear-all runs at a time.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn clear_all(&self) -> ClearAllOutcome {
        let Some(_guard) = ClearGuard::acquire(&self.inner.clearing) else {
            tracing::debug!("clear all already running");
            return ClearAllOutcome::AlreadyRunning;
        };

        let feed = &self.inner.feed;
        let ids = feed.with_store(FeedStore::begin_removal_all);
        let animations = feed.animations();

        let exits = ids.iter().zip(0u32..).map(|(id, k)| async move {
            let delay = CLEAR_STAGGER * k;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            run_exit(animations, id).await
        });
        let superseded = join_all(exits).await.into_iter().filter(|done| !done).count();
        if superseded > 0 {
            tracing::debug!(superseded, "some exit animations were interrupted");
        }

        let acknowledged = match self.inner.identity.resolve_user_id() {
            Some(user_id) => match self.inner.service.clear_all(&user_id).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to clear notifications on server");
                    false
                }
            },
            None => {
                tracing::warn!("clearing locally only: no signed-in user");
                false
            }
        };

        feed.with_store(FeedStore::clear);
        animations.reset_all();
        self.pull(PullKind::Initial).await;

        tracing::info!(removed = ids.len(), acknowledged, "notifications cleared");
        ClearAllOutcome::Cleared {
            removed: ids.len(),
            acknowledged,
        }
    }

    /// Whether a clear-all is in progress.
    #[must_use]
    pub fn is_clearing(&self) -> bool {
        self.inner.clearing.load(Ordering::Acquire)
    }
}
