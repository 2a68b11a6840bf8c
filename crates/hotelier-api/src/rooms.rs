// Room catalog endpoints.
//
// The backend applies no server-side filtering to the room list; callers
// filter client-side.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AvailabilityRequest, AvailabilityResponse, ListResponse, RoomRecord};

impl ApiClient {
    /// List every room. `GET /rooms`
    pub async fn list_rooms(&self) -> Result<Vec<RoomRecord>, Error> {
        let rooms: ListResponse<RoomRecord> = self.get("rooms").await?;
        let rooms = rooms.into_vec();
        debug!(count = rooms.len(), "fetched rooms");
        Ok(rooms)
    }

    /// Fetch a single room. `GET /rooms/{id}`
    pub async fn get_room(&self, id: u64) -> Result<RoomRecord, Error> {
        self.get(&format!("rooms/{id}")).await
    }

    /// Room-level availability check. `POST /rooms/check-availability`
    pub async fn check_room_availability(
        &self,
        req: &AvailabilityRequest,
    ) -> Result<AvailabilityResponse, Error> {
        self.post("rooms/check-availability", req).await
    }
}
