//! Application layer driving the feed.
//!
//! Screen events enter through [`FeedController::dispatch`] and fan out into the
//! async flows that own every mutation of the feed:
//!
//! ```text
//! Screen Events → dispatch → { pull | push listener | mark_read | clear_all | navigate }
//!                                 ↓                                  ↓
//!                             FeedStore  ←──────── AnimationRegistry ─┘
//! ```
//!
//! # Modules
//!
//! - [`controller`]: The controller itself and the [`Event`] type
//! - [`ingest`]: Pull-based loading and the push subscription
//! - [`lifecycle`]: Mark-read and clear-all removal flows

pub mod controller;
pub mod ingest;
pub mod lifecycle;

pub use controller::{Event, FeedController};
pub use ingest::PullOutcome;
pub use lifecycle::{ClearAllOutcome, MarkReadOutcome};
