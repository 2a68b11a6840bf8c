#![allow(clippy::unwrap_used)]
// Hotel facade and session behaviour against a mocked booking API.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotelier_api::ApiClient;
use hotelier_core::{
    AuthEvent, CoreError, DraftUpdate, FixedClock, FlowError, GuestUpdate, Hotel, LandingView,
    Money, PaymentMethod, PaymentUpdate, RoomQuery, SubmitOutcome,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Hotel) {
    let server = MockServer::start().await;
    let client =
        ApiClient::with_client(reqwest::Client::new(), &format!("{}/api", server.uri())).unwrap();
    let hotel = Hotel::from_client(client).with_clock(Arc::new(FixedClock(date(2024, 5, 20))));
    (server, hotel)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rooms_body() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Standard Single", "price": "120.00", "maxOccupancy": 1, "isActive": true},
        {"id": 2, "name": "Deluxe Double", "price": "200.00", "maxOccupancy": 3,
         "amenities": ["Wi-Fi", "Balcony"], "isActive": true},
        {"id": 3, "name": "Closed Wing", "price": "90.00", "maxOccupancy": 2, "isActive": false}
    ])
}

async fn login_as(server: &MockServer, hotel: &Hotel, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"id": 9, "email": "staff@example.com", "full_name": "Kofi", "role": role}
        })))
        .mount(server)
        .await;
    hotel
        .session()
        .login("staff@example.com", &SecretString::from("pw".to_string()))
        .await
        .unwrap();
}

// ── Rooms ───────────────────────────────────────────────────────────

#[tokio::test]
async fn rooms_are_filtered_client_side() {
    let (server, hotel) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rooms_body()))
        .mount(&server)
        .await;

    let all = hotel.rooms(&RoomQuery::default()).await.unwrap();
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

    let family = hotel
        .rooms(&RoomQuery {
            guests: Some(3),
            ..RoomQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(family.len(), 1);
    assert_eq!(family[0].price, Money::from_cents(20_000));
}

#[tokio::test]
async fn hydrate_room_only_fills_an_empty_slot() {
    let (server, hotel) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/rooms/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Deluxe Double", "price": "200.00", "maxOccupancy": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = hotel.booking_flow();
    assert!(hotel.hydrate_room(&flow, 2).await.unwrap());
    assert_eq!(flow.draft().room.unwrap().name, "Deluxe Double");
    assert!(!hotel.hydrate_room(&flow, 2).await.unwrap());
}

#[tokio::test]
async fn availability_checks_range_before_calling() {
    let (_server, hotel) = setup().await;
    let err = hotel
        .check_availability(2, date(2024, 6, 4), date(2024, 6, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }), "got: {err:?}");
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn login_picks_landing_view_by_role() {
    let (server, hotel) = setup().await;
    let events = hotel.session().events();
    login_as(&server, &hotel, "RECEPTIONIST").await;

    assert_eq!(*events.borrow(), AuthEvent::SignedIn);
    assert!(hotel.session().is_authenticated());
    assert!(hotel.session().has_role("receptionist"));
    assert_eq!(hotel.session().landing_view(), Some(LandingView::Reception));
    assert_eq!(LandingView::Reception.path(), "/reception");

    hotel.session().logout();
    assert!(!hotel.session().is_authenticated());
    assert_eq!(hotel.session().landing_view(), None);
    assert_eq!(*events.borrow(), AuthEvent::SignedOut);
}

#[tokio::test]
async fn unauthorized_call_requires_login() {
    let (server, hotel) = setup().await;
    login_as(&server, &hotel, "GUEST").await;
    let events = hotel.session().events();

    Mock::given(method("GET"))
        .and(path("/api/bookings/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;

    let err = hotel.my_bookings().await.unwrap_err();
    assert!(err.is_login_required());
    assert!(!hotel.session().is_authenticated());
    assert!(hotel.session().user().is_none());
    assert_eq!(*events.borrow(), AuthEvent::LoginRequired);
}

// ── Booking flow end to end ─────────────────────────────────────────

fn fill_flow(flow: &hotelier_core::BookingFlow<ApiClient>) {
    flow.update_draft(DraftUpdate::new().dates(date(2024, 6, 1), date(2024, 6, 4)).party(2, 0));
    flow.advance().unwrap();
    flow.update_draft(DraftUpdate::new().guest(GuestUpdate {
        first_name: Some("Ama".into()),
        last_name: Some("Mensah".into()),
        email: Some("ama@example.com".into()),
        phone: Some("0201234567".into()),
        address: Some("1 Ring Road".into()),
        city: Some("Accra".into()),
        country: Some("Ghana".into()),
        postal_code: None,
    }));
    flow.advance().unwrap();
    flow.update_draft(DraftUpdate::new().payment(PaymentUpdate {
        method: Some(PaymentMethod::Wallet),
        ..PaymentUpdate::default()
    }));
}

async fn mount_room(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/rooms/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Deluxe Double", "price": "200.00", "maxOccupancy": 3
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn flow_submits_through_the_api() {
    let (server, hotel) = setup().await;
    mount_room(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "b-42",
            "reference": "NCH-00AA11BB22",
            "check_in": "2024-06-01",
            "check_out": "2024-06-04",
            "adults": 2,
            "status": "PENDING",
            "payment_status": "UNPAID"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = hotel.booking_flow();
    hotel.hydrate_room(&flow, 2).await.unwrap();
    fill_flow(&flow);
    assert_eq!(flow.compute_total(), Money::from_cents(60_000));

    let outcome = flow.submit().await.unwrap();
    let reservation = match outcome {
        SubmitOutcome::Created(r) => r,
        other => panic!("expected Created, got {other:?}"),
    };
    assert_eq!(reservation.reference, "NCH-00AA11BB22");
    assert_eq!(reservation.nights(), 3);
    assert_eq!(flow.step(), 4);
}

#[tokio::test]
async fn flow_surfaces_server_message_verbatim() {
    let (server, hotel) = setup().await;
    mount_room(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"non_field_errors": ["Check-out must be after check-in"]})),
        )
        .mount(&server)
        .await;

    let flow = hotel.booking_flow();
    hotel.hydrate_room(&flow, 2).await.unwrap();
    fill_flow(&flow);

    let err = flow.submit().await.unwrap_err();
    assert_eq!(err.to_string(), "Check-out must be after check-in");
    assert_eq!(flow.step(), 3);
    assert_eq!(
        hotel.notifications().list()[0].message,
        "Check-out must be after check-in"
    );
}

#[tokio::test]
async fn flow_401_reaches_the_session_watcher() {
    let (server, hotel) = setup().await;
    login_as(&server, &hotel, "GUEST").await;
    mount_room(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let watcher = hotel.session().spawn_watcher(cancel.clone());
    let mut events = hotel.session().events();

    let flow = hotel.booking_flow();
    hotel.hydrate_room(&flow, 2).await.unwrap();
    fill_flow(&flow);
    assert_eq!(flow.submit().await.unwrap_err(), FlowError::LoginRequired);

    tokio::time::timeout(Duration::from_secs(5), async {
        while *events.borrow_and_update() != AuthEvent::LoginRequired {
            events.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    cancel.cancel();
    watcher.await.unwrap();
}
