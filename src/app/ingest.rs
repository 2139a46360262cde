//! Getting notifications into the feed.
//!
//! Two paths feed the store. Pulls fetch the full list from the service and
//! replace the feed wholesale. Pushes arrive one at a time on a broadcast channel
//! while the screen is focused and are prepended with an arrival animation.
//!
//! The two paths do not coordinate: a pull that completes after a push replaces
//! the pushed record with whatever the server returned.

use super::controller::FeedController;
use crate::domain::PushEvent;
use crate::feed::animation::{next_frame, run_arrival};
use crate::feed::PullKind;
use chrono::Utc;
use std::sync::{Arc, MutexGuard, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Result of one pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Feed replaced; carries the new length.
    Loaded(usize),
    /// No signed-in user; nothing was fetched.
    NoUser,
    /// Fetch failed; the feed is unchanged.
    Failed,
}

impl FeedController {
    /// Fetches the full feed for the current user and replaces the store with it.
    ///
    /// The loading indicator for `kind` is raised for the duration and always
    /// lowered afterwards. Failures leave the existing feed untouched.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn pull(&self, kind: PullKind) -> PullOutcome {
        let feed = &self.inner.feed;
        feed.with_store(|s| s.begin_pull(kind));
        let outcome = self.load().await;
        feed.with_store(|s| s.end_pull(kind));
        outcome
    }

    async fn load(&self) -> PullOutcome {
        let Some(user_id) = self.inner.identity.resolve_user_id() else {
            tracing::info!("skipping notification fetch: no signed-in user");
            return PullOutcome::NoUser;
        };

        match self.inner.service.fetch_notifications(&user_id, &self.inner.role).await {
            Ok(payload) => {
                let count = self.inner.feed.with_store(|s| s.replace(payload));
                tracing::debug!(count, "notifications loaded");
                PullOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, network = e.is_network(), "failed to fetch notifications");
                PullOutcome::Failed
            }
        }
    }

    /// Prepends a pushed notification and starts its arrival animation.
    ///
    /// The record is inserted fully transparent so the first rendered frame never
    /// shows it at rest; the fade starts on the following frame. The returned
    /// task completes when the arrival animation ends.
    pub fn ingest_push(&self, event: PushEvent) -> JoinHandle<()> {
        let record = event.into_record(Utc::now());
        let id = record.id.clone();
        tracing::debug!(notification_id = %id, "ingesting push notification");

        let feed = &self.inner.feed;
        let generation = feed.animations().prepare_arrival(&id);
        feed.with_store(|s| s.prepend(record));

        let animations = feed.animations_handle();
        tokio::spawn(async move {
            next_frame().await;
            if !run_arrival(&animations, &id, generation).await {
                tracing::debug!(notification_id = %id, "arrival animation superseded");
            }
        })
    }

    /// Starts listening for push events. A no-op while already subscribed.
    ///
    /// Events published before this call are never seen. The listener does not
    /// keep the controller alive; it ends once the last handle is dropped.
    pub fn start_push_subscription(&self) -> Option<JoinHandle<()>> {
        let mut slot = self.subscription();
        if slot.as_ref().is_some_and(|token| !token.is_cancelled()) {
            return None;
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        let mut receiver = self.inner.push.subscribe();
        let inner = Arc::downgrade(&self.inner);
        tracing::debug!("push subscription started");

        Some(tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    () = token.cancelled() => break,
                    received = receiver.recv() => received,
                };
                if token.is_cancelled() {
                    break;
                }
                match received {
                    Ok(event) => {
                        let Some(inner) = inner.upgrade() else { break };
                        FeedController { inner }.ingest_push(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "push listener fell behind; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("push subscription ended");
        }))
    }

    /// Stops listening for push events. Returns `false` if not subscribed.
    pub fn stop_push_subscription(&self) -> bool {
        match self.subscription().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether push events are currently being ingested.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription().as_ref().is_some_and(|token| !token.is_cancelled())
    }

    fn subscription(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.inner.subscription.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
