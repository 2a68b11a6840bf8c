// ── Reservation domain types ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::guest::GuestInfo;
use super::money::Money;
use super::room::Room;

/// Lifecycle of a reservation on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    CheckedIn,
    CheckedOut,
    Unknown,
}

impl BookingStatus {
    /// Guests may cancel only before arrival.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Unknown,
}

/// How the stay was settled at the front desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SettlementMethod {
    Unspecified,
    Cash,
    Momo,
    Unknown,
}

/// A reservation created by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub id: String,
    /// Human-facing reference such as `NCH-1A2B3C4D5E`.
    pub reference: String,
    pub room: Option<Room>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub special_requests: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub settlement: SettlementMethod,
    pub amount_paid: Option<Money>,
    pub guest: GuestInfo,
    pub created_at: Option<DateTime<Utc>>,
}

impl Reservation {
    pub fn nights(&self) -> u32 {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => super::nights_between(check_in, check_out),
            _ => 0,
        }
    }
}
