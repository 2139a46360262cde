//! Render snapshot of the feed.
//!
//! [`FeedViewModel`] is what a list view needs for one frame: the rows with their
//! current animation values and the header indicators. Computing it never mutates
//! the feed; rows without an animation entry render in the rest pose.

use super::animation::AnimationState;
use super::store::Phase;
use super::Feed;
use chrono::{DateTime, Utc};

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItemView {
    pub id: String,
    pub title: String,
    pub message: String,
    pub icon: &'static str,
    /// Relative age such as `"5m ago"`, when the record has a usable date.
    pub age: Option<String>,
    pub opacity: f64,
    pub offset: f64,
    pub glow_pulse: f64,
    pub elevated: bool,
    /// Whether the row is animating out and should ignore taps.
    pub leaving: bool,
}

/// Everything the list needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedViewModel {
    pub items: Vec<FeedItemView>,
    /// Full-screen loading state (first load, focus, reconciliation).
    pub loading: bool,
    /// Pull-to-refresh indicator.
    pub refreshing: bool,
    /// Show the "no notifications" placeholder.
    pub empty: bool,
    /// See [`FeedStore::reflow_generation`](super::FeedStore::reflow_generation).
    pub reflow_generation: u64,
}

impl FeedViewModel {
    /// Builds the view model for `feed` as of `now`.
    #[must_use]
    pub fn compute(feed: &Feed, now: DateTime<Utc>) -> Self {
        let store = feed.snapshot();
        let animations = feed.animations();

        let items: Vec<FeedItemView> = store
            .entries()
            .iter()
            .map(|entry| {
                let record = &entry.record;
                let state = animations.get(&record.id).unwrap_or(AnimationState::REST);
                FeedItemView {
                    id: record.id.clone(),
                    title: record.title.clone(),
                    message: record.message.clone(),
                    icon: record.kind().icon(),
                    age: record.time_ago(now),
                    opacity: state.opacity,
                    offset: state.offset,
                    glow_pulse: state.glow_pulse,
                    elevated: state.elevated,
                    leaving: entry.phase == Phase::Removing,
                }
            })
            .collect();

        let loading = store.is_loading();
        Self {
            empty: items.is_empty() && !loading,
            items,
            loading,
            refreshing: store.is_refreshing(),
            reflow_generation: store.reflow_generation(),
        }
    }
}
