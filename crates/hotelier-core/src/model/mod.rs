// ── Domain model ──
//
// Canonical types shared by the booking flow, the session service and
// the CLI. Wire records from hotelier-api are translated in `convert`.

mod guest;
mod money;
mod reservation;
mod room;
mod user;

use chrono::NaiveDate;

pub use guest::{GuestInfo, PaymentInfo, PaymentMethod};
pub use money::{Money, MoneyParseError};
pub use reservation::{BookingStatus, PaymentStatus, Reservation, SettlementMethod};
pub use room::Room;
pub use user::{Role, User};

/// Calendar nights from `check_in` to `check_out`; 0 when reversed.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    u32::try_from(days).unwrap_or(if days < 0 { 0 } else { u32::MAX })
}
