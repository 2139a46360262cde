//! In-crate fakes for the external collaborators.

use crate::domain::{Booking, Envelope, FeedError, NotificationRecord, Result};
use crate::navigation::{NavigationTarget, Navigator};
use crate::service::NotificationService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct ServiceState {
    notifications: Vec<NotificationRecord>,
    bookings: Vec<Booking>,
    wrapped: bool,
    fetch_latency: Duration,
    ack_latency: Duration,
    fail_fetch: bool,
    fail_mark_read: bool,
    fail_clear_all: bool,
    fail_bookings: bool,
    fetches: Vec<(String, String)>,
    mark_reads: Vec<(String, String, Instant)>,
    clear_alls: Vec<(String, Instant)>,
    booking_fetches: Vec<String>,
}

/// Scriptable [`NotificationService`] that records every call.
#[derive(Debug, Default)]
pub struct FakeService {
    state: Mutex<ServiceState>,
}

impl FakeService {
    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap()
    }

    pub fn set_notifications(&self, records: Vec<NotificationRecord>) {
        self.lock().notifications = records;
    }

    pub fn set_bookings(&self, bookings: Vec<Value>) {
        self.lock().bookings = bookings.into_iter().map(Booking::from).collect();
    }

    pub fn wrap_responses(&self, wrapped: bool) {
        self.lock().wrapped = wrapped;
    }

    pub fn set_fetch_latency(&self, latency: Duration) {
        self.lock().fetch_latency = latency;
    }

    pub fn set_ack_latency(&self, latency: Duration) {
        self.lock().ack_latency = latency;
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.lock().fail_fetch = fail;
    }

    pub fn fail_mark_read(&self, fail: bool) {
        self.lock().fail_mark_read = fail;
    }

    pub fn fail_clear_all(&self, fail: bool) {
        self.lock().fail_clear_all = fail;
    }

    pub fn fail_bookings(&self, fail: bool) {
        self.lock().fail_bookings = fail;
    }

    pub fn fetches(&self) -> Vec<(String, String)> {
        self.lock().fetches.clone()
    }

    pub fn mark_reads(&self) -> Vec<(String, String, Instant)> {
        self.lock().mark_reads.clone()
    }

    pub fn clear_alls(&self) -> Vec<(String, Instant)> {
        self.lock().clear_alls.clone()
    }

    pub fn booking_fetches(&self) -> Vec<String> {
        self.lock().booking_fetches.clone()
    }

    fn envelope<T>(&self, items: Vec<T>) -> Envelope<T> {
        if self.lock().wrapped {
            Envelope::Wrapped { data: items }
        } else {
            Envelope::Bare(items)
        }
    }
}

#[async_trait]
impl NotificationService for FakeService {
    async fn fetch_notifications(&self, user_id: &str, role: &str) -> Result<Envelope<NotificationRecord>> {
        let latency = {
            let mut state = self.lock();
            state.fetches.push((user_id.to_string(), role.to_string()));
            state.fetch_latency
        };
        pause(latency).await;

        let (fail, records) = {
            let state = self.lock();
            (state.fail_fetch, state.notifications.clone())
        };
        if fail {
            return Err(FeedError::Network("fetch failed".to_string()));
        }
        Ok(self.envelope(records))
    }

    async fn mark_read(&self, notification_id: &str, user_id: &str) -> Result<()> {
        let latency = self.lock().ack_latency;
        pause(latency).await;

        let mut state = self.lock();
        state
            .mark_reads
            .push((notification_id.to_string(), user_id.to_string(), Instant::now()));
        if state.fail_mark_read {
            return Err(FeedError::Network("mark read failed".to_string()));
        }
        state.notifications.retain(|r| r.id != notification_id);
        Ok(())
    }

    async fn clear_all(&self, user_id: &str) -> Result<()> {
        let latency = self.lock().ack_latency;
        pause(latency).await;

        let mut state = self.lock();
        state.clear_alls.push((user_id.to_string(), Instant::now()));
        if state.fail_clear_all {
            return Err(FeedError::Network("clear all failed".to_string()));
        }
        state.notifications.clear();
        Ok(())
    }

    async fn fetch_bookings(&self, user_id: &str) -> Result<Envelope<Booking>> {
        let (fail, bookings) = {
            let mut state = self.lock();
            state.booking_fetches.push(user_id.to_string());
            (state.fail_bookings, state.bookings.clone())
        };
        if fail {
            return Err(FeedError::Network("bookings failed".to_string()));
        }
        Ok(self.envelope(bookings))
    }
}

async fn pause(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// [`Navigator`] that remembers every request.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<NavigationTarget>>,
}

impl RecordingNavigator {
    pub fn targets(&self) -> Vec<NavigationTarget> {
        self.targets.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: NavigationTarget) {
        self.targets.lock().unwrap().push(target);
    }
}
