// The one network call the booking flow makes.

use std::future::Future;

use hotelier_api::{ApiClient, CreateBookingRequest};

use crate::error::CoreError;
use crate::model::Reservation;

/// Creates reservations on behalf of a [`BookingFlow`](super::BookingFlow).
pub trait BookingBackend: Send + Sync + 'static {
    fn submit_booking(
        &self,
        request: CreateBookingRequest,
    ) -> impl Future<Output = Result<Reservation, CoreError>> + Send;
}

impl BookingBackend for ApiClient {
    async fn submit_booking(&self, request: CreateBookingRequest) -> Result<Reservation, CoreError> {
        let record = self.create_booking(&request).await?;
        Reservation::try_from(record)
    }
}
