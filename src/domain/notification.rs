//! Notification record model.
//!
//! A [`NotificationRecord`] is created by ingestion (pull or push) and is never
//! updated in place afterwards. Booking cross-reference fields arrive under several
//! historical names and are kept verbatim in [`NotificationRecord::extra`] until a
//! tap needs them; see [`NotificationRecord::trackable_id`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Field names that may carry a booking cross-reference, in lookup priority order.
pub const TRACKABLE_ID_FIELDS: [&str; 4] = ["bookingTrackId", "BookingTrackID", "trackId", "bookingId"];

/// A single entry of the notification feed.
///
/// Unknown payload fields are preserved in `extra`, which is where booking
/// cross-references live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Stable unique identifier. Numeric ids from the server are stringified.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    /// Free-form classification such as `completed` or `payment`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_type: String,

    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created_date: Option<String>,

    /// Every other field of the payload, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotificationRecord {
    /// Creates a record with no cross-reference fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use notifeed::NotificationRecord;
    ///
    /// let record = NotificationRecord::new("42", "Trip finished", "Rate your driver");
    /// assert_eq!(record.id, "42");
    /// assert!(record.trackable_id().is_none());
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            action_type: String::new(),
            created_date: None,
            extra: Map::new(),
        }
    }

    /// Sets the action type, builder style.
    #[must_use]
    pub fn with_action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = action_type.into();
        self
    }

    /// Sets the creation timestamp, builder style.
    #[must_use]
    pub fn with_created_date(mut self, created_date: impl Into<String>) -> Self {
        self.created_date = Some(created_date.into());
        self
    }

    /// Adds an arbitrary payload field, builder style.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the first non-empty booking cross-reference, checking
    /// [`TRACKABLE_ID_FIELDS`] in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use notifeed::NotificationRecord;
    ///
    /// let record = NotificationRecord::new("1", "t", "m")
    ///     .with_field("bookingId", 77)
    ///     .with_field("trackId", "TRK-9");
    /// assert_eq!(record.trackable_id().as_deref(), Some("TRK-9"));
    /// ```
    #[must_use]
    pub fn trackable_id(&self) -> Option<String> {
        TRACKABLE_ID_FIELDS
            .iter()
            .filter_map(|field| self.extra.get(*field))
            .find_map(id_from_value)
    }

    /// Classifies the record for icon selection.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        ActionKind::from_action_type(&self.action_type)
    }

    /// Returns a human-readable age such as `"5m ago"`, or `None` when the
    /// creation date is missing or not RFC 3339.
    ///
    /// - Less than 1 minute: `"just now"`
    /// - Less than 1 hour: `"Xm ago"`
    /// - Less than 1 day: `"Xh ago"`
    /// - Otherwise: `"Xd ago"`
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> Option<String> {
        let created = DateTime::parse_from_rfc3339(self.created_date.as_deref()?).ok()?;
        let diff = (now - created.with_timezone(&Utc)).num_seconds().max(0);

        let label = if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            format!("{}m ago", diff / SECONDS_PER_MINUTE)
        } else if diff < SECONDS_PER_DAY {
            format!("{}h ago", diff / SECONDS_PER_HOUR)
        } else {
            format!("{}d ago", diff / SECONDS_PER_DAY)
        };
        Some(label)
    }
}

/// Icon classification derived from a record's `actionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Completed,
    Started,
    Payment,
    Cancelled,
    Reminder,
    Generic,
}

impl ActionKind {
    /// Maps a free-form action type onto a kind. Matching is case-insensitive;
    /// anything unrecognised is [`ActionKind::Generic`].
    #[must_use]
    pub fn from_action_type(action_type: &str) -> Self {
        match action_type.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "started" => Self::Started,
            "payment" => Self::Payment,
            "cancelled" | "canceled" => Self::Cancelled,
            "reminder" => Self::Reminder,
            _ => Self::Generic,
        }
    }

    /// Icon name used by the rendered list.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Completed => "check-circle",
            Self::Started => "play-circle",
            Self::Payment => "credit-card",
            Self::Cancelled => "close-circle",
            Self::Reminder => "clock",
            Self::Generic => "bell",
        }
    }
}

/// Renders a JSON scalar as an identifier string.
///
/// Strings are taken as-is, numbers are formatted, and empty strings, nulls and
/// compound values yield `None`.
#[must_use]
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| serde::de::Error::custom("notification id must be a non-empty string or number"))
}

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn deserializes_numeric_id_and_keeps_unknown_fields() {
        let record: NotificationRecord = serde_json::from_value(serde_json::json!({
            "id": 12,
            "title": "Booking started",
            "message": "Your washer is on the way",
            "actionType": "started",
            "createdDate": "2026-10-19T08:00:00Z",
            "BookingTrackID": "TRK-1"
        }))
        .unwrap();

        assert_eq!(record.id, "12");
        assert_eq!(record.kind(), ActionKind::Started);
        assert_eq!(record.trackable_id().as_deref(), Some("TRK-1"));
    }

    #[test]
    fn rejects_missing_id() {
        let result: std::result::Result<NotificationRecord, _> =
            serde_json::from_value(serde_json::json!({ "id": "", "title": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn trackable_id_follows_priority_and_skips_empty() {
        let record = NotificationRecord::new("1", "t", "m")
            .with_field("bookingTrackId", "")
            .with_field("BookingTrackID", "B-2")
            .with_field("bookingId", "77");
        assert_eq!(record.trackable_id().as_deref(), Some("B-2"));

        let plain = NotificationRecord::new("2", "t", "m").with_field("bookingId", "77");
        assert_eq!(plain.trackable_id().as_deref(), Some("77"));
    }

    #[test]
    fn action_kind_icons() {
        assert_eq!(ActionKind::from_action_type("Payment").icon(), "credit-card");
        assert_eq!(ActionKind::from_action_type("COMPLETED"), ActionKind::Completed);
        assert_eq!(ActionKind::from_action_type("promo").icon(), "bell");
    }

    #[test]
    fn time_ago_buckets() {
        let now = DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z").unwrap().with_timezone(&Utc);
        let at = |delta: Duration| {
            NotificationRecord::new("1", "t", "m")
                .with_created_date((now - delta).to_rfc3339())
                .time_ago(now)
        };

        assert_eq!(at(Duration::seconds(10)).as_deref(), Some("just now"));
        assert_eq!(at(Duration::minutes(5)).as_deref(), Some("5m ago"));
        assert_eq!(at(Duration::hours(3)).as_deref(), Some("3h ago"));
        assert_eq!(at(Duration::days(7)).as_deref(), Some("7d ago"));
        assert_eq!(NotificationRecord::new("1", "t", "m").time_ago(now), None);
    }
}
