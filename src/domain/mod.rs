//! Domain layer for the notification feed engine.
//!
//! Plain data types with no async or I/O concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`notification`]: Feed record model and icon classification
//! - [`booking`]: Booking entities referenced by notifications
//! - [`payload`]: Wrapped/bare list response normalization
//! - [`push`]: Push event wire shape and record synthesis

pub mod booking;
pub mod error;
pub mod notification;
pub mod payload;
pub mod push;

pub use booking::Booking;
pub use error::{FeedError, Result};
pub use notification::{ActionKind, NotificationRecord};
pub use payload::Envelope;
pub use push::PushEvent;
