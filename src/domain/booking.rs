//! Booking entities referenced by notifications.
//!
//! Bookings are opaque to the feed engine: they are fetched only to find the one a
//! tapped notification points at, then handed to navigation unchanged.

use super::notification::id_from_value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names carrying a booking's track identifier, in lookup order.
const TRACK_ID_FIELDS: [&str; 3] = ["BookingTrackID", "bookingTrackId", "trackId"];

/// Field names carrying a booking's primary identifier, in lookup order.
const PRIMARY_ID_FIELDS: [&str; 4] = ["BookingID", "bookingId", "id", "_id"];

/// A booking as returned by the booking list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Booking(pub Map<String, Value>);

impl Booking {
    /// Track identifier, if the payload carries one.
    #[must_use]
    pub fn track_id(&self) -> Option<String> {
        Self::first_id(&self.0, &TRACK_ID_FIELDS)
    }

    /// Primary identifier, if the payload carries one.
    #[must_use]
    pub fn primary_id(&self) -> Option<String> {
        Self::first_id(&self.0, &PRIMARY_ID_FIELDS)
    }

    /// Whether either identifier equals `ident` when both are compared as strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use notifeed::Booking;
    ///
    /// let booking: Booking = serde_json::from_value(serde_json::json!({ "BookingID": 77 })).unwrap();
    /// assert!(booking.matches("77"));
    /// assert!(!booking.matches("78"));
    /// ```
    #[must_use]
    pub fn matches(&self, ident: &str) -> bool {
        self.track_id().as_deref() == Some(ident) || self.primary_id().as_deref() == Some(ident)
    }

    fn first_id(map: &Map<String, Value>, fields: &[&str]) -> Option<String> {
        fields.iter().filter_map(|f| map.get(*f)).find_map(id_from_value)
    }
}

impl From<Value> for Booking {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_track_or_primary_id() {
        let booking = Booking::from(json!({ "BookingID": 10, "BookingTrackID": "TRK-10" }));
        assert!(booking.matches("10"));
        assert!(booking.matches("TRK-10"));
        assert!(!booking.matches("11"));
    }

    #[test]
    fn non_object_is_empty() {
        let booking = Booking::from(json!("oops"));
        assert!(booking.primary_id().is_none());
        assert!(!booking.matches(""));
    }
}
