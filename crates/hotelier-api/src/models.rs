// Wire types for the booking REST API.
//
// Request bodies use the camelCase keys the backend's write serializers
// expect; response records accept the snake_case keys the read
// serializers emit. Unknown fields are ignored throughout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Rooms ───────────────────────────────────────────────────────────

/// A room as returned by `GET /rooms` and `GET /rooms/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Nightly rate as a decimal string (`"150.00"`). The backend emits
    /// either a JSON string or a number depending on its decimal settings.
    #[serde(deserialize_with = "decimal_string")]
    pub price: String,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub size: Option<String>,
    #[serde(default)]
    pub max_occupancy: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Body of `POST /bookings/check-availability`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub room_id: u64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Bookings ────────────────────────────────────────────────────────

/// Guest details nested in a booking creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfoPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub room_id: u64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub special_requests: String,
    pub guest_info: GuestInfoPayload,
}

/// A reservation record as returned by the bookings endpoints.
///
/// Only `id` is mandatory; everything else falls back to a default so
/// that both the full read shape and a minimal echo decode.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_room")]
    pub room: Option<RoomRecord>,
    #[serde(default, alias = "checkIn")]
    pub check_in: Option<NaiveDate>,
    #[serde(default, alias = "checkOut")]
    pub check_out: Option<NaiveDate>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default, alias = "specialRequests")]
    pub special_requests: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub amount_paid: Option<String>,
    #[serde(default)]
    pub guest_first_name: String,
    #[serde(default)]
    pub guest_last_name: String,
    #[serde(default)]
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default)]
    pub guest_address: String,
    #[serde(default)]
    pub guest_city: String,
    #[serde(default)]
    pub guest_country: String,
    #[serde(default)]
    pub guest_postal_code: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ── Accounts ────────────────────────────────────────────────────────

/// The authenticated user as returned by `/auth/me` and the login response.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

/// Shape shared by the login and registration responses.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: UserRecord,
}

// ── Collections ─────────────────────────────────────────────────────

/// List endpoints return either a bare array or a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paged { results: items } => items,
        }
    }
}

// ── Lenient field decoders ──────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_adults() -> u32 {
    1
}

fn decimal_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a decimal number or string, got {other}"
        ))),
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

fn opt_scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Nested room objects decode fully; a bare room id decodes to `None`.
fn lenient_room<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RoomRecord>, D::Error> {
    lenient_object(d)
}

fn lenient_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        obj @ Value::Object(_) => serde_json::from_value(obj)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn room_price_accepts_string_and_number() {
        let a: RoomRecord =
            serde_json::from_value(json!({"id": 1, "name": "Single", "price": "150.00"})).unwrap();
        let b: RoomRecord =
            serde_json::from_value(json!({"id": 2, "name": "Suite", "price": 420.5})).unwrap();
        assert_eq!(a.price, "150.00");
        assert_eq!(b.price, "420.5");
        assert!(a.is_active);
    }

    #[test]
    fn booking_record_decodes_full_read_shape() {
        let record: BookingRecord = serde_json::from_value(json!({
            "id": "0b5c9f0e-4f6e-4f7e-9a53-3f3f0f6a1c2d",
            "reference": "NCH-1A2B3C4D5E",
            "room": {"id": 3, "name": "Executive", "price": "300.00", "maxOccupancy": 2},
            "check_in": "2024-07-10",
            "check_out": "2024-07-13",
            "adults": 2,
            "children": 0,
            "status": "PENDING",
            "payment_status": "UNPAID",
            "payment_method": "UNSPECIFIED",
            "amount_paid": "0.00",
            "guest_first_name": "Ama",
            "created_at": "2024-06-01T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(record.reference, "NCH-1A2B3C4D5E");
        assert_eq!(record.room.as_ref().map(|r| r.id), Some(3));
        assert_eq!(record.check_in, NaiveDate::from_ymd_opt(2024, 7, 10));
        assert_eq!(record.amount_paid.as_deref(), Some("0.00"));
        assert_eq!(record.guest_first_name, "Ama");
    }

    #[test]
    fn booking_record_tolerates_minimal_echo() {
        let record: BookingRecord = serde_json::from_value(json!({
            "id": 17,
            "reference": "NCH-0000000001",
            "room": 3,
            "checkIn": "2024-07-10"
        }))
        .unwrap();

        assert_eq!(record.id, "17");
        assert!(record.room.is_none());
        assert_eq!(record.check_in, NaiveDate::from_ymd_opt(2024, 7, 10));
        assert_eq!(record.adults, 1);
    }

    #[test]
    fn create_request_uses_camel_case_keys() {
        let req = CreateBookingRequest {
            room_id: 3,
            check_in: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 7, 13).unwrap(),
            adults: 2,
            children: 1,
            special_requests: "Late arrival".into(),
            guest_info: GuestInfoPayload {
                first_name: "Ama".into(),
                postal_code: "GA-123".into(),
                ..GuestInfoPayload::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["roomId"], 3);
        assert_eq!(body["checkIn"], "2024-07-10");
        assert_eq!(body["specialRequests"], "Late arrival");
        assert_eq!(body["guestInfo"]["firstName"], "Ama");
        assert_eq!(body["guestInfo"]["postalCode"], "GA-123");
    }

    #[test]
    fn list_response_unwraps_both_shapes() {
        let plain: ListResponse<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        let paged: ListResponse<u32> =
            serde_json::from_value(json!({"count": 2, "results": [3, 4]})).unwrap();
        assert_eq!(plain.into_vec(), vec![1, 2]);
        assert_eq!(paged.into_vec(), vec![3, 4]);
    }
}
