//! Push-delivered notification events.
//!
//! The push channel delivers `{ request: { content: { title, body, data } } }`.
//! [`PushEvent::into_record`] turns one into a [`NotificationRecord`] ready to be
//! prepended to the feed.

use super::notification::{id_from_value, NotificationRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title used when the event carries none.
pub const DEFAULT_TITLE: &str = "New notification";

/// Message used when the event carries none.
pub const DEFAULT_MESSAGE: &str = "You have a new update";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(default)]
    pub request: PushRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushRequest {
    #[serde(default)]
    pub content: PushContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl PushEvent {
    /// Builds an event from its visible content and data map.
    #[must_use]
    pub fn new(title: Option<&str>, body: Option<&str>, data: Map<String, Value>) -> Self {
        Self {
            request: PushRequest {
                content: PushContent {
                    title: title.map(String::from),
                    body: body.map(String::from),
                    data,
                },
            },
        }
    }

    /// Synthesizes the feed record for this event.
    ///
    /// - `id` is `data.id` rendered as a string, or the millisecond timestamp
    ///   `now` when absent.
    /// - `title`/`message` come from `data`, then the visible content, then
    ///   [`DEFAULT_TITLE`]/[`DEFAULT_MESSAGE`].
    /// - `createdDate` defaults to `now`.
    /// - Every other data field is carried over untouched.
    #[must_use]
    pub fn into_record(self, now: DateTime<Utc>) -> NotificationRecord {
        let PushContent { title, body, mut data } = self.request.content;

        let id = data
            .remove("id")
            .as_ref()
            .and_then(id_from_value)
            .unwrap_or_else(|| now.timestamp_millis().to_string());

        let title = take_string(&mut data, "title")
            .or_else(|| title.filter(|t| !t.is_empty()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let message = take_string(&mut data, "message")
            .or_else(|| body.filter(|b| !b.is_empty()))
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        let action_type = take_string(&mut data, "actionType").unwrap_or_default();

        let created_date = take_string(&mut data, "createdDate")
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        NotificationRecord {
            id,
            title,
            message,
            action_type,
            created_date: Some(created_date),
            extra: data,
        }
    }
}

fn take_string(data: &mut Map<String, Value>, key: &str) -> Option<String> {
    match data.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn parses_wire_shape() {
        let event: PushEvent = serde_json::from_value(json!({
            "request": { "content": {
                "title": "Payment received",
                "body": "Thanks!",
                "data": { "id": 501, "actionType": "payment", "createdDate": "2026-10-19T11:59:00Z", "bookingId": "77" }
            }}
        }))
        .unwrap();

        let record = event.into_record(now());
        assert_eq!(record.id, "501");
        assert_eq!(record.title, "Payment received");
        assert_eq!(record.message, "Thanks!");
        assert_eq!(record.action_type, "payment");
        assert_eq!(record.created_date.as_deref(), Some("2026-10-19T11:59:00Z"));
        assert_eq!(record.trackable_id().as_deref(), Some("77"));
    }

    #[test]
    fn falls_back_to_defaults_and_timestamp_id() {
        let record = PushEvent::default().into_record(now());
        assert_eq!(record.id, now().timestamp_millis().to_string());
        assert_eq!(record.title, DEFAULT_TITLE);
        assert_eq!(record.message, DEFAULT_MESSAGE);
        assert_eq!(record.created_date.as_deref(), Some("2026-10-19T12:00:00.000Z"));
    }
}
