// ── Hotel facade ──
//
// One entry point wiring the API client to the session, notification,
// flag and analytics services. Views hold a `Hotel` and ask it for
// catalog data, their bookings and fresh booking flows.

use std::sync::Arc;

use chrono::NaiveDate;
use hotelier_api::{ApiClient, AvailabilityRequest};
use tracing::debug;

use crate::analytics::{AnalyticsEvent, Tracker};
use crate::booking::{BookingBackend, BookingFlow, DraftUpdate};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::convert;
use crate::error::CoreError;
use crate::flags::FeatureFlags;
use crate::model::{Money, Reservation, Room};
use crate::notify::Notifications;
use crate::session::Session;

/// Client-side filters for the room list; the server applies none.
#[derive(Debug, Clone, Default)]
pub struct RoomQuery {
    /// Party size the room must accommodate.
    pub guests: Option<u32>,
    pub max_price: Option<Money>,
    /// Case-insensitive match on name, description or amenities.
    pub search: Option<String>,
    pub include_inactive: bool,
}

impl RoomQuery {
    pub fn matches(&self, room: &Room) -> bool {
        if !self.include_inactive && !room.is_active {
            return false;
        }
        if self.guests.is_some_and(|g| !room.fits(g)) {
            return false;
        }
        if self.max_price.is_some_and(|max| room.price > max) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                room.name.to_lowercase().contains(&term)
                    || room.description.to_lowercase().contains(&term)
                    || room.amenities.iter().any(|a| a.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

#[derive(Clone)]
pub struct Hotel {
    client: ApiClient,
    session: Session,
    notifications: Notifications,
    flags: FeatureFlags,
    tracker: Tracker,
    clock: Arc<dyn Clock>,
}

impl Hotel {
    /// Build the API client from `config`. A stored token is installed
    /// but not verified; call [`Session::current_user`] to check it.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.as_str(), &config.transport())?;
        if let Some(token) = &config.token {
            client.tokens().set(token.clone());
        }
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: ApiClient) -> Self {
        Self {
            session: Session::new(client.clone()),
            client,
            notifications: Notifications::new(),
            flags: FeatureFlags::with_defaults(),
            tracker: Tracker::disabled(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_tracker(mut self, tracker: Tracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ── Rooms ────────────────────────────────────────────────────────

    pub async fn rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, CoreError> {
        let records = self.session.observe(self.client.list_rooms().await.map_err(CoreError::from))?;
        let rooms: Vec<Room> = convert::rooms(records)?
            .into_iter()
            .filter(|r| query.matches(r))
            .collect();
        debug!(count = rooms.len(), "rooms after filtering");
        if let Some(term) = query.search.as_deref() {
            self.tracker.track(AnalyticsEvent::search(term, rooms.len()));
        }
        Ok(rooms)
    }

    pub async fn room(&self, id: u64) -> Result<Room, CoreError> {
        let record = self.session.observe(self.client.get_room(id).await.map_err(CoreError::from))?;
        Room::try_from(record)
    }

    /// Whether `room_id` is free for the stay. The range is checked
    /// locally before asking the server.
    pub async fn check_availability(
        &self,
        room_id: u64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<bool, CoreError> {
        if check_out <= check_in {
            return Err(CoreError::InvalidInput {
                message: "Check-out date must be after check-in date".into(),
            });
        }
        let req = AvailabilityRequest {
            room_id,
            check_in,
            check_out,
        };
        let resp = self
            .session
            .observe(self.client.check_availability(&req).await.map_err(CoreError::from))?;
        Ok(resp.available)
    }

    // ── Bookings ─────────────────────────────────────────────────────

    pub async fn my_bookings(&self) -> Result<Vec<Reservation>, CoreError> {
        let records = self.session.observe(self.client.my_bookings().await.map_err(CoreError::from))?;
        convert::reservations(records)
    }

    pub async fn booking(&self, id: &str) -> Result<Reservation, CoreError> {
        let record = self.session.observe(self.client.get_booking(id).await.map_err(CoreError::from))?;
        Reservation::try_from(record)
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<(), CoreError> {
        self.session
            .observe(self.client.cancel_booking(id).await.map_err(CoreError::from))?;
        self.notifications.success("Booking cancelled");
        Ok(())
    }

    // ── Booking flow ─────────────────────────────────────────────────

    /// A fresh flow sharing this hotel's services.
    pub fn booking_flow(&self) -> BookingFlow<ApiClient> {
        BookingFlow::builder(self.client.clone())
            .clock(Arc::clone(&self.clock))
            .notifications(self.notifications.clone())
            .tracker(self.tracker.clone())
            .build()
    }

    /// Load room `id` into the flow when entered through a direct room
    /// link. Returns `false` without a request if a room is already set.
    pub async fn hydrate_room<B: BookingBackend>(
        &self,
        flow: &BookingFlow<B>,
        id: u64,
    ) -> Result<bool, CoreError> {
        if flow.draft().room.is_some() {
            return Ok(false);
        }
        let room = self.room(id).await?;
        flow.update_draft(DraftUpdate::new().room(room));
        Ok(true)
    }
}
