//! Tap handling: from a notification to the booking it refers to.
//!
//! Tapping never changes a notification's lifecycle; it only looks up the
//! referenced booking and, on a match, hands it to the [`Navigator`] one frame
//! later. Every failure is a silent no-op with a log line.

use crate::domain::NotificationRecord;
use crate::feed::animation::next_frame;
use crate::identity::IdentityResolver;
use crate::service::NotificationService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Where the booking hand-off goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Navigator (stack) that hosts the booking screen.
    pub stack: String,
    /// Screen inside `stack`.
    pub screen: String,
    /// Parameter name the booking is passed under.
    pub param_key: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            stack: "BookingStack".to_string(),
            screen: "BookingDetails".to_string(),
            param_key: "booking".to_string(),
        }
    }
}

/// A navigation request: `screen_id` plus opaque params.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTarget {
    pub screen_id: String,
    pub params: Value,
}

/// Screen navigation collaborator. Results are not interpreted.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: NavigationTarget);
}

/// What a tap resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Hand-off scheduled for the next frame.
    Scheduled { ident: String },
    /// The record carries no booking reference.
    NoTrackableId,
    /// No signed-in user.
    NoUser,
    /// The booking list could not be fetched.
    FetchFailed,
    /// No booking matches the reference.
    NoMatch { ident: String },
}

/// Resolves taps on notifications into booking navigation.
#[derive(Clone)]
pub struct NavigationResolver {
    service: Arc<dyn NotificationService>,
    identity: IdentityResolver,
    navigator: Arc<dyn Navigator>,
    config: NavigationConfig,
}

impl NavigationResolver {
    pub fn new(
        service: Arc<dyn NotificationService>,
        identity: IdentityResolver,
        navigator: Arc<dyn Navigator>,
        config: NavigationConfig,
    ) -> Self {
        Self {
            service,
            identity,
            navigator,
            config,
        }
    }

    /// Looks up the booking `record` refers to and schedules navigation to it.
    ///
    /// The booking list is scanned linearly for the first booking whose track or
    /// primary identifier equals the record's trackable id.
    pub async fn resolve(&self, record: &NotificationRecord) -> NavigationOutcome {
        let Some(ident) = record.trackable_id() else {
            tracing::debug!(notification_id = %record.id, "notification has no booking reference");
            return NavigationOutcome::NoTrackableId;
        };

        let Some(user_id) = self.identity.resolve_user_id() else {
            tracing::warn!(notification_id = %record.id, "cannot open booking without a signed-in user");
            return NavigationOutcome::NoUser;
        };

        let bookings = match self.service.fetch_bookings(&user_id).await {
            Ok(bookings) => bookings.into_items(),
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "failed to fetch bookings");
                return NavigationOutcome::FetchFailed;
            }
        };

        let Some(booking) = bookings.into_iter().find(|booking| booking.matches(&ident)) else {
            tracing::debug!(ident = %ident, "no booking matches notification");
            return NavigationOutcome::NoMatch { ident };
        };

        let target = NavigationTarget {
            screen_id: self.config.stack.clone(),
            params: json!({
                "screen": self.config.screen,
                "params": { self.config.param_key.as_str(): booking },
            }),
        };

        tracing::debug!(ident = %ident, screen = %self.config.screen, "scheduling booking navigation");
        let navigator = Arc::clone(&self.navigator);
        tokio::spawn(async move {
            next_frame().await;
            navigator.navigate(target);
        });

        NavigationOutcome::Scheduled { ident }
    }
}

impl std::fmt::Debug for NavigationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use crate::testing::{FakeService, RecordingNavigator};
    use crate::feed::animation::FRAME_INTERVAL;
    use serde_json::json;
    use std::time::Duration;

    fn resolver(service: &Arc<FakeService>, navigator: &Arc<RecordingNavigator>) -> NavigationResolver {
        let store = MemoryKeyValueStore::with_entries([("userId", "u-1")]);
        NavigationResolver::new(
            Arc::clone(service) as Arc<dyn NotificationService>,
            IdentityResolver::new(Arc::new(store)),
            Arc::clone(navigator) as Arc<dyn Navigator>,
            NavigationConfig::default(),
        )
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn navigates_to_matching_booking_next_frame() {
        let service = Arc::new(FakeService::default());
        service.set_bookings(vec![json!({ "BookingID": "76" }), json!({ "BookingID": "77", "status": "active" })]);
        let navigator = Arc::new(RecordingNavigator::default());
        let record = NotificationRecord::new("n1", "t", "m").with_field("bookingId", "77");

        let outcome = resolver(&service, &navigator).resolve(&record).await;

        assert_eq!(outcome, NavigationOutcome::Scheduled { ident: "77".to_string() });
        assert!(navigator.targets().is_empty());

        tokio::time::sleep(FRAME_INTERVAL + Duration::from_millis(1)).await;
        let targets = navigator.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].screen_id, "BookingStack");
        assert_eq!(targets[0].params["screen"], "BookingDetails");
        assert_eq!(targets[0].params["params"]["booking"], json!({ "BookingID": "77", "status": "active" }));
        assert_eq!(service.booking_fetches(), vec!["u-1".to_string()]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn no_trackable_id_is_a_no_op() {
        let service = Arc::new(FakeService::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let outcome = resolver(&service, &navigator).resolve(&NotificationRecord::new("n1", "t", "m")).await;

        assert_eq!(outcome, NavigationOutcome::NoTrackableId);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(navigator.targets().is_empty());
        assert!(service.booking_fetches().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn missing_booking_and_fetch_failure_are_no_ops() {
        let service = Arc::new(FakeService::default());
        service.set_bookings(vec![json!({ "BookingID": 1 })]);
        let navigator = Arc::new(RecordingNavigator::default());
        let record = NotificationRecord::new("n1", "t", "m").with_field("trackId", "TRK-2");

        let r = resolver(&service, &navigator);
        assert_eq!(r.resolve(&record).await, NavigationOutcome::NoMatch { ident: "TRK-2".to_string() });

        service.fail_bookings(true);
        assert_eq!(r.resolve(&record).await, NavigationOutcome::FetchFailed);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(navigator.targets().is_empty());
    }
}
