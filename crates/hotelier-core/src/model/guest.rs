// ── Guest and payment details entered during the booking flow ──

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Contact details of the person making the reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl GuestInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}

/// How the guest intends to pay.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PaymentMethod {
    /// Card details are entered and validated locally.
    #[default]
    Card,
    /// Redirect-based mobile money checkout.
    MobileMoney,
    /// Redirect-based wallet checkout (PayPal and similar).
    Wallet,
}

impl PaymentMethod {
    /// Redirect-based methods collect no fields in the flow.
    pub fn requires_card_details(self) -> bool {
        matches!(self, Self::Card)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit / debit card",
            Self::MobileMoney => "Mobile money",
            Self::Wallet => "Online wallet",
        }
    }
}

/// Payment details. Card number and CVV never leave memory and are
/// cleared once a reservation has been created.
#[derive(Clone)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub card_number: SecretString,
    pub card_name: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: SecretString,
}

impl PaymentInfo {
    /// Drop every captured card field, keeping the chosen method.
    pub fn clear_card(&mut self) {
        let method = self.method;
        *self = Self {
            method,
            ..Self::default()
        };
    }

    pub fn has_card_data(&self) -> bool {
        !self.card_number.expose_secret().is_empty()
            || !self.card_name.is_empty()
            || !self.expiry.is_empty()
            || !self.cvv.expose_secret().is_empty()
    }
}

impl Default for PaymentInfo {
    fn default() -> Self {
        Self {
            method: PaymentMethod::Card,
            card_number: SecretString::from(String::new()),
            card_name: String::new(),
            expiry: String::new(),
            cvv: SecretString::from(String::new()),
        }
    }
}

impl PartialEq for PaymentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.card_number.expose_secret() == other.card_number.expose_secret()
            && self.card_name == other.card_name
            && self.expiry == other.expiry
            && self.cvv.expose_secret() == other.cvv.expose_secret()
    }
}

impl Eq for PaymentInfo {}

impl fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentInfo")
            .field("method", &self.method)
            .field("card_number", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}
