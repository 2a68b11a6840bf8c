// ── Room domain type ──

use serde::Serialize;

use super::money::Money;

/// A bookable room from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Nightly rate.
    pub price: Money,
    pub size: Option<String>,
    pub max_occupancy: Option<u32>,
    pub amenities: Vec<String>,
    pub is_active: bool,
}

impl Room {
    /// Whether a party of `guests` fits. Rooms without a declared
    /// capacity accept any party.
    pub fn fits(&self, guests: u32) -> bool {
        self.max_occupancy.is_none_or(|max| guests <= max)
    }
}
