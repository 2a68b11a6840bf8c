//! Booking logic and client-side services between `hotelier-api` and the
//! views (CLI).
//!
//! - **[`BookingFlow`]**: the four-step reservation wizard. Holds the
//!   in-memory draft, gates each step on validation, derives nights and
//!   totals, and submits the reservation exactly once.
//!
//! - **[`Hotel`]**: facade over the API client for the room catalog,
//!   availability checks and the user's bookings. Vends booking flows
//!   wired to the shared services.
//!
//! - **[`Session`]**: login, registration and the cached user. A 401 from
//!   any call surfaces as [`AuthEvent::LoginRequired`].
//!
//! - **[`Notifications`]**, **[`FeatureFlags`]**, **[`Tracker`]**:
//!   transient messages, remotely refreshed flags and best-effort
//!   analytics. None of them can block the booking flow.
//!
//! - **Domain model** ([`model`]) and form rules ([`validation`]).

pub mod analytics;
pub mod booking;
pub mod clock;
pub mod config;
pub mod convert;
pub mod error;
pub mod flags;
pub mod hotel;
pub mod model;
pub mod notify;
pub mod session;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use analytics::{AnalyticsEvent, AnalyticsSink, Tracker, TracingSink};
pub use booking::{
    BookingBackend, BookingDraft, BookingFlow, BookingSummary, DraftUpdate, FlowError,
    GuestUpdate, Patch, PaymentUpdate, Stage, SubmitOutcome,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ClientConfig, Credentials, DEFAULT_API_URL, TlsVerification};
pub use error::CoreError;
pub use flags::{FeatureFlags, FlagSource};
pub use hotel::{Hotel, RoomQuery};
pub use notify::{Notification, NotificationKind, Notifications};
pub use session::{AuthEvent, LandingView, Session};
pub use validation::FieldErrors;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BookingStatus, GuestInfo, Money, PaymentInfo, PaymentMethod, PaymentStatus, Reservation,
    Role, Room, SettlementMethod, User,
};
