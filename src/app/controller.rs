//! Screen-facing facade of the feed engine.
//!
//! [`FeedController`] owns the feed and its collaborators and turns screen
//! [`Event`]s into spawned tasks. It is cheap to clone; all clones drive the same
//! feed.
//!
//! ```text
//! Event ─▶ dispatch ─┬─▶ pull (focus / refresh)       ─▶ FeedStore::replace
//!                    ├─▶ push subscription (focus)     ─▶ FeedStore::prepend + arrival
//!                    ├─▶ mark_read / clear_all         ─▶ exit animations ─▶ removal
//!                    └─▶ NavigationResolver (select)   ─▶ Navigator
//! ```

use crate::domain::PushEvent;
use crate::feed::{Feed, FeedViewModel, PullKind};
use crate::identity::IdentityResolver;
use crate::navigation::{NavigationResolver, Navigator};
use crate::service::NotificationService;
use crate::storage::KeyValueStore;
use crate::Config;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the push fan-out channel.
const PUSH_CHANNEL_CAPACITY: usize = 64;

/// Things that happen on the notifications screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Screen became visible: reload and start listening for pushes.
    FocusGained,
    /// Screen was hidden: stop listening for pushes.
    FocusLost,
    /// Pull-to-refresh.
    Refresh,
    /// A push event handed over directly rather than through
    /// [`FeedController::push_sender`]. Dropped unless the screen is focused.
    Push(PushEvent),
    /// Close button on one row.
    Close(String),
    /// "Clear all" button.
    ClearAll,
    /// Tap on a row.
    Select(String),
}

pub(crate) struct Inner {
    pub(crate) feed: Feed,
    pub(crate) service: Arc<dyn NotificationService>,
    pub(crate) identity: IdentityResolver,
    pub(crate) navigation: NavigationResolver,
    pub(crate) role: String,
    pub(crate) push: broadcast::Sender<PushEvent>,
    pub(crate) subscription: Mutex<Option<CancellationToken>>,
    pub(crate) clearing: AtomicBool,
}

/// Drives one notification feed.
#[derive(Clone)]
pub struct FeedController {
    pub(crate) inner: Arc<Inner>,
}

impl FeedController {
    /// Wires a controller from its collaborators.
    ///
    /// `store` is the local key-value storage the current user is read from.
    pub fn new(
        config: &Config,
        service: Arc<dyn NotificationService>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let identity = IdentityResolver::new(store);
        let navigation = NavigationResolver::new(
            Arc::clone(&service),
            identity.clone(),
            navigator,
            config.navigation.clone(),
        );
        let (push, _) = broadcast::channel(PUSH_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                feed: Feed::new(),
                service,
                identity,
                navigation,
                role: config.role.clone(),
                push,
                subscription: Mutex::new(None),
                clearing: AtomicBool::new(false),
            }),
        }
    }

    /// The feed this controller drives.
    #[must_use]
    pub fn feed(&self) -> &Feed {
        &self.inner.feed
    }

    /// Sender the push-delivery subsystem publishes into. Events sent while the
    /// screen is not focused are not seen by the feed.
    #[must_use]
    pub fn push_sender(&self) -> broadcast::Sender<PushEvent> {
        self.inner.push.clone()
    }

    /// Render snapshot as of now.
    #[must_use]
    pub fn view_model(&self) -> FeedViewModel {
        FeedViewModel::compute(&self.inner.feed, chrono::Utc::now())
    }

    /// Handles a screen event, spawning whatever work it triggers.
    ///
    /// Returns the spawned task so callers may await it; dropping the handle does
    /// not cancel the work. Must be called within a tokio runtime.
    pub fn dispatch(&self, event: Event) -> Option<JoinHandle<()>> {
        let _span = tracing::debug_span!("dispatch", event = ?event).entered();

        match event {
            Event::FocusGained => {
                self.start_push_subscription();
                let this = self.clone();
                Some(tokio::spawn(async move {
                    this.pull(PullKind::Initial).await;
                }))
            }
            Event::FocusLost => {
                self.stop_push_subscription();
                None
            }
            Event::Refresh => {
                let this = self.clone();
                Some(tokio::spawn(async move {
                    this.pull(PullKind::Refresh).await;
                }))
            }
            Event::Push(push) => {
                if self.is_subscribed() {
                    Some(self.ingest_push(push))
                } else {
                    tracing::debug!("dropping push event received while unfocused");
                    None
                }
            }
            Event::Close(id) => {
                let this = self.clone();
                Some(tokio::spawn(async move {
                    this.mark_read(&id).await;
                }))
            }
            Event::ClearAll => {
                let this = self.clone();
                Some(tokio::spawn(async move {
                    this.clear_all().await;
                }))
            }
            Event::Select(id) => {
                let Some(record) = self.inner.feed.with_store(|s| s.get(&id).map(|e| e.record.clone())) else {
                    tracing::debug!(notification_id = %id, "selected notification is no longer in the feed");
                    return None;
                };
                let navigation = self.inner.navigation.clone();
                Some(tokio::spawn(async move {
                    navigation.resolve(&record).await;
                }))
            }
        }
    }
}

impl std::fmt::Debug for FeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedController")
            .field("feed", &self.inner.feed)
            .field("role", &self.inner.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::NotificationRecord;
    use crate::storage::MemoryKeyValueStore;
    use crate::testing::{FakeService, RecordingNavigator};
    use serde_json::json;
    use std::time::Duration;

    pub(crate) struct Harness {
        pub controller: FeedController,
        pub service: Arc<FakeService>,
        pub navigator: Arc<RecordingNavigator>,
    }

    pub(crate) fn harness() -> Harness {
        let service = Arc::new(FakeService::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let store = MemoryKeyValueStore::with_entries([("user", r#"{"id":"u-1"}"#)]);
        let controller = FeedController::new(
            &Config::default(),
            Arc::clone(&service) as Arc<dyn NotificationService>,
            Arc::new(store),
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        );
        Harness {
            controller,
            service,
            navigator,
        }
    }

    pub(crate) fn records(ids: &[&str]) -> Vec<NotificationRecord> {
        ids.iter().map(|id| NotificationRecord::new(*id, format!("title {id}"), "message")).collect()
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn focus_loads_feed_with_role() {
        let h = harness();
        h.service.set_notifications(records(&["b", "a"]));
        h.service.wrap_responses(true);

        h.controller.dispatch(Event::FocusGained).unwrap().await.unwrap();

        assert_eq!(h.controller.feed().snapshot().ids(), ["b", "a"]);
        assert_eq!(h.service.fetches(), vec![("u-1".to_string(), "customer".to_string())]);
        assert!(h.controller.is_subscribed());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn select_navigates_without_marking_read() {
        let h = harness();
        h.service.set_notifications(vec![NotificationRecord::new("n1", "t", "m").with_field("bookingId", "77")]);
        h.service.set_bookings(vec![json!({ "BookingID": "77" })]);
        h.controller.dispatch(Event::FocusGained).unwrap().await.unwrap();

        h.controller.dispatch(Event::Select("n1".to_string())).unwrap().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(h.navigator.targets().len(), 1);
        assert!(h.service.mark_reads().is_empty());
        assert!(h.controller.feed().snapshot().contains("n1"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn select_unknown_id_does_nothing() {
        let h = harness();
        assert!(h.controller.dispatch(Event::Select("ghost".to_string())).is_none());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn push_event_dropped_when_unfocused() {
        let h = harness();
        assert!(h.controller.dispatch(Event::Push(PushEvent::default())).is_none());
        assert!(h.controller.feed().snapshot().is_empty());
    }
}
