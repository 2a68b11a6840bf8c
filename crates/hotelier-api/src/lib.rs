//! Async Rust client for the hotel booking REST API.
//!
//! [`ApiClient`] wraps `reqwest` with base-URL handling, bearer-token
//! injection and error-body decoding. Endpoint groups live in their own
//! modules as inherent methods:
//!
//! - [`account`]: login, registration, current user
//! - [`rooms`]: room catalog and room-level availability
//! - [`bookings`]: reservation creation, lookup, cancellation
//!
//! Wire types are in [`models`]; they mirror the backend's JSON and are
//! translated into domain types by `hotelier-core`.

pub mod account;
pub mod auth;
pub mod bookings;
pub mod client;
pub mod error;
pub mod models;
pub mod rooms;
pub mod transport;

pub use account::LoginOutcome;
pub use auth::{TokenState, TokenStore};
pub use client::ApiClient;
pub use error::Error;
pub use models::{
    AvailabilityRequest, AvailabilityResponse, BookingRecord, CreateBookingRequest,
    GuestInfoPayload, LoginRequest, RegisterRequest, RoomRecord, UserRecord,
};
pub use transport::{TlsMode, TransportConfig};
