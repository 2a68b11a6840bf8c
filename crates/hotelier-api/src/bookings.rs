// Reservation endpoints.

use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AvailabilityRequest, AvailabilityResponse, BookingRecord, CreateBookingRequest, ListResponse,
};

impl ApiClient {
    /// Create a reservation. `POST /bookings`
    ///
    /// Non-success responses surface the server's message verbatim via
    /// [`Error::Api`].
    pub async fn create_booking(&self, req: &CreateBookingRequest) -> Result<BookingRecord, Error> {
        debug!(room_id = req.room_id, check_in = %req.check_in, check_out = %req.check_out, "creating booking");
        let record: BookingRecord = self.post("bookings", req).await?;
        info!(id = %record.id, reference = %record.reference, "booking created");
        Ok(record)
    }

    /// Booking-level availability check. `POST /bookings/check-availability`
    pub async fn check_availability(
        &self,
        req: &AvailabilityRequest,
    ) -> Result<AvailabilityResponse, Error> {
        self.post("bookings/check-availability", req).await
    }

    /// Reservations owned by the authenticated user. `GET /bookings/me`
    pub async fn my_bookings(&self) -> Result<Vec<BookingRecord>, Error> {
        let list: ListResponse<BookingRecord> = self.get("bookings/me").await?;
        Ok(list.into_vec())
    }

    /// `GET /bookings/{id}`
    pub async fn get_booking(&self, id: &str) -> Result<BookingRecord, Error> {
        self.get(&format!("bookings/{id}")).await
    }

    /// Cancel a reservation. `DELETE /bookings/{id}/cancel`
    pub async fn cancel_booking(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("bookings/{id}/cancel")).await?;
        info!(id, "booking cancelled");
        Ok(())
    }
}
