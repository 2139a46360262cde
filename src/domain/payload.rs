//! Normalization of list responses.
//!
//! The notification and booking endpoints answer either `{"data": [...]}` or a bare
//! JSON array. [`Envelope`] captures both shapes so call sites never branch on the
//! raw JSON themselves.

use crate::domain::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A list response in either of its two wire shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// `{"data": [...]}`
    Wrapped { data: Vec<T> },
    /// `[...]`
    Bare(Vec<T>),
}

impl<T> Envelope<T> {
    /// Flattens either shape into the ordered list it carries.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parses a raw JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Json`](crate::FeedError::Json) if the value is neither
    /// shape or an element fails to parse.
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl<T> From<Vec<T>> for Envelope<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Bare(items)
    }
}

/// Parses a raw JSON response straight into its items.
///
/// # Errors
///
/// See [`Envelope::from_json`].
///
/// # Examples
///
/// ```
/// use notifeed::domain::payload::normalize;
/// use notifeed::NotificationRecord;
///
/// let wrapped: Vec<NotificationRecord> =
///     normalize(serde_json::json!({ "data": [{ "id": "a" }] })).unwrap();
/// let bare: Vec<NotificationRecord> = normalize(serde_json::json!([{ "id": "a" }])).unwrap();
/// assert_eq!(wrapped, bare);
/// ```
pub fn normalize<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    Envelope::from_json(value).map(Envelope::into_items)
}
