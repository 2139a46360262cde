//! Remote notification service seam.
//!
//! The HTTP client lives outside this crate. The feed engine consumes it through
//! [`NotificationService`]; list endpoints hand back an [`Envelope`] so the
//! wrapped/bare response shapes are normalized in one place.

use crate::domain::{Booking, Envelope, NotificationRecord, Result};
use async_trait::async_trait;

/// Network collaborator for notifications and bookings.
///
/// Every error is reported as [`FeedError::Network`](crate::FeedError::Network)
/// by convention. Calls have no timeout or cancellation on the engine side.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Fetches the user's notifications, most recent first. `role` is the fixed
    /// role discriminator from [`Config::role`](crate::Config::role).
    async fn fetch_notifications(&self, user_id: &str, role: &str) -> Result<Envelope<NotificationRecord>>;

    /// Marks one notification as read.
    async fn mark_read(&self, notification_id: &str, user_id: &str) -> Result<()>;

    /// Marks every notification of the user as read.
    async fn clear_all(&self, user_id: &str) -> Result<()>;

    /// Fetches the user's full booking list.
    async fn fetch_bookings(&self, user_id: &str) -> Result<Envelope<Booking>>;
}
