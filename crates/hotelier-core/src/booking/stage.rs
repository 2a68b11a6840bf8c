// Position in the four-step booking wizard.

use serde::Serialize;

use crate::model::Reservation;

/// A reservation exists exactly when the flow has reached `Confirmation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "reservation", rename_all = "snake_case")]
pub enum Stage {
    /// Step 1: room, dates and party size.
    #[default]
    Dates,
    /// Step 2: contact details.
    GuestDetails,
    /// Step 3: payment method and card details.
    Payment,
    /// Step 4: the server accepted the booking.
    Confirmation(Reservation),
}

impl Stage {
    /// 1-based step number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Dates => 1,
            Self::GuestDetails => 2,
            Self::Payment => 3,
            Self::Confirmation(_) => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dates => "Select dates",
            Self::GuestDetails => "Guest information",
            Self::Payment => "Payment",
            Self::Confirmation(_) => "Confirmation",
        }
    }

    pub fn reservation(&self) -> Option<&Reservation> {
        match self {
            Self::Confirmation(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_confirmation(&self) -> bool {
        matches!(self, Self::Confirmation(_))
    }
}
