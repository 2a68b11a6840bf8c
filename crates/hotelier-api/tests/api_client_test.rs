#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotelier_api::{
    ApiClient, AvailabilityRequest, CreateBookingRequest, Error, GuestInfoPayload, TokenState,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client =
        ApiClient::with_client(reqwest::Client::new(), &format!("{}/api", server.uri())).unwrap();
    (server, client)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn booking_request() -> CreateBookingRequest {
    CreateBookingRequest {
        room_id: 3,
        check_in: date(2024, 6, 1),
        check_out: date(2024, 6, 4),
        adults: 2,
        children: 0,
        special_requests: String::new(),
        guest_info: GuestInfoPayload {
            first_name: "Ama".into(),
            last_name: "Mensah".into(),
            email: "ama@example.com".into(),
            phone: "+233 20 000 0000".into(),
            address: "1 Ring Road".into(),
            city: "Accra".into(),
            country: "Ghana".into(),
            postal_code: "GA-100".into(),
        },
    }
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

async fn login(server: &MockServer, client: &ApiClient) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "refresh": "ref-456",
            "user": {"id": 7, "email": "ama@example.com", "full_name": "Ama Mensah", "role": "GUEST"}
        })))
        .mount(server)
        .await;
    client.login("ama@example.com", &secret("pw")).await.unwrap();
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    assert!(client.tokens().is_present());
    assert_eq!(client.tokens().state(), TokenState::Present);
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let result = client.login("ama@example.com", &secret("nope")).await;
    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert_eq!(client.tokens().state(), TokenState::Absent);
}

#[tokio::test]
async fn test_bearer_token_attached_after_login() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "email": "ama@example.com", "roles": ["GUEST"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client.current_user().await.unwrap();
    assert_eq!(user.email, "ama@example.com");
}

#[tokio::test]
async fn test_401_revokes_token() {
    let (server, client) = setup().await;
    login(&server, &client).await;
    let mut rx = client.tokens().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/bookings/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let result = client.my_bookings().await;
    assert!(matches!(result, Err(Error::Unauthorized)), "got: {result:?}");
    assert!(!client.tokens().is_present());
    assert_eq!(*rx.borrow_and_update(), TokenState::Revoked);
}

#[tokio::test]
async fn test_logout_clears_token() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    client.logout();
    assert!(!client.tokens().is_present());
    assert_eq!(client.tokens().state(), TokenState::Absent);
}

// ── Room tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_rooms_plain_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Standard", "price": "200.00", "maxOccupancy": 2, "isActive": true},
            {"id": 2, "name": "Suite", "price": 450, "maxOccupancy": 4, "isActive": false}
        ])))
        .mount(&server)
        .await;

    let rooms = client.list_rooms().await.unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].price, "200.00");
    assert!(!rooms[1].is_active);
}

#[tokio::test]
async fn test_get_room_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = client.get_room(99).await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

// ── Booking tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_booking_posts_camel_case_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .and(body_json(json!({
            "roomId": 3,
            "checkIn": "2024-06-01",
            "checkOut": "2024-06-04",
            "adults": 2,
            "children": 0,
            "specialRequests": "",
            "guestInfo": {
                "firstName": "Ama",
                "lastName": "Mensah",
                "email": "ama@example.com",
                "phone": "+233 20 000 0000",
                "address": "1 Ring Road",
                "city": "Accra",
                "country": "Ghana",
                "postalCode": "GA-100"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "b1",
            "reference": "NCH-ABCDEF0123",
            "check_in": "2024-06-01",
            "check_out": "2024-06-04",
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client.create_booking(&booking_request()).await.unwrap();
    assert_eq!(record.reference, "NCH-ABCDEF0123");
    assert_eq!(record.status, "PENDING");
}

#[tokio::test]
async fn test_create_booking_error_message_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Room unavailable for selected dates"})),
        )
        .mount(&server)
        .await;

    let err = client.create_booking(&booking_request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Room unavailable for selected dates");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_check_availability() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bookings/check-availability"))
        .and(body_json(json!({"roomId": 3, "checkIn": "2024-06-01", "checkOut": "2024-06-04"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available": false})))
        .mount(&server)
        .await;

    let resp = client
        .check_availability(&AvailabilityRequest {
            room_id: 3,
            check_in: date(2024, 6, 1),
            check_out: date(2024, 6, 4),
        })
        .await
        .unwrap();
    assert!(!resp.available);
}

#[tokio::test]
async fn test_my_bookings_paged_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": "b1", "reference": "NCH-0000000001", "status": "CONFIRMED"}]
        })))
        .mount(&server)
        .await;

    let bookings = client.my_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].status, "CONFIRMED");
}

#[tokio::test]
async fn test_cancel_booking_refused() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/bookings/b1/cancel"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Booking cannot be cancelled"})),
        )
        .mount(&server)
        .await;

    let err = client.cancel_booking("b1").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Booking cannot be cancelled");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_room(1).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}
