// ── Booking draft and partial updates ──
//
// The draft lives only in memory. Updates merge field by field:
// top-level fields replace when present, guest and payment details
// merge key-wise, and the room/date slots can be cleared explicitly.

use chrono::NaiveDate;
use secrecy::SecretString;

use crate::model::{GuestInfo, Money, PaymentInfo, PaymentMethod, Room, nights_between};

/// Tri-state update for optional slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the current value alone.
    Keep,
    Set(T),
    Clear,
}

impl<T> Patch<T> {
    fn apply(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *slot = Some(value),
            Self::Clear => *slot = None,
        }
    }
}

// Manual impl: the derive would demand `T: Default`.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `Some` sets, `None` keeps.
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl From<GuestInfo> for GuestUpdate {
    /// Every field set.
    fn from(g: GuestInfo) -> Self {
        Self {
            first_name: Some(g.first_name),
            last_name: Some(g.last_name),
            email: Some(g.email),
            phone: Some(g.phone),
            address: Some(g.address),
            city: Some(g.city),
            country: Some(g.country),
            postal_code: Some(g.postal_code),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaymentUpdate {
    pub method: Option<PaymentMethod>,
    pub card_number: Option<SecretString>,
    pub card_name: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<SecretString>,
}

/// A partial change to the draft. Fields left at their default keep the
/// draft's current value.
#[derive(Debug, Clone, Default)]
pub struct DraftUpdate {
    pub room: Patch<Room>,
    pub check_in: Patch<NaiveDate>,
    pub check_out: Patch<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub special_requests: Option<String>,
    pub guest: GuestUpdate,
    pub payment: PaymentUpdate,
}

impl DraftUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(mut self, room: Room) -> Self {
        self.room = Patch::Set(room);
        self
    }

    pub fn dates(mut self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        self.check_in = Patch::Set(check_in);
        self.check_out = Patch::Set(check_out);
        self
    }

    pub fn party(mut self, adults: u32, children: u32) -> Self {
        self.adults = Some(adults);
        self.children = Some(children);
        self
    }

    pub fn special_requests(mut self, text: impl Into<String>) -> Self {
        self.special_requests = Some(text.into());
        self
    }

    pub fn guest(mut self, guest: GuestUpdate) -> Self {
        self.guest = guest;
        self
    }

    pub fn payment(mut self, payment: PaymentUpdate) -> Self {
        self.payment = payment;
        self
    }
}

/// Everything entered so far in the booking flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub room: Option<Room>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub guest: GuestInfo,
    pub payment: PaymentInfo,
    pub special_requests: String,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            room: None,
            check_in: None,
            check_out: None,
            adults: 1,
            children: 0,
            guest: GuestInfo::default(),
            payment: PaymentInfo::default(),
            special_requests: String::new(),
        }
    }
}

impl BookingDraft {
    /// Merge `update` into the draft. Performs no validation.
    pub fn apply(&mut self, update: DraftUpdate) {
        let DraftUpdate {
            room,
            check_in,
            check_out,
            adults,
            children,
            special_requests,
            guest,
            payment,
        } = update;

        room.apply(&mut self.room);
        check_in.apply(&mut self.check_in);
        check_out.apply(&mut self.check_out);
        replace(&mut self.adults, adults);
        replace(&mut self.children, children);
        replace(&mut self.special_requests, special_requests);

        let g = &mut self.guest;
        replace(&mut g.first_name, guest.first_name);
        replace(&mut g.last_name, guest.last_name);
        replace(&mut g.email, guest.email);
        replace(&mut g.phone, guest.phone);
        replace(&mut g.address, guest.address);
        replace(&mut g.city, guest.city);
        replace(&mut g.country, guest.country);
        replace(&mut g.postal_code, guest.postal_code);

        let p = &mut self.payment;
        replace(&mut p.method, payment.method);
        replace(&mut p.card_number, payment.card_number);
        replace(&mut p.card_name, payment.card_name);
        replace(&mut p.expiry, payment.expiry);
        replace(&mut p.cvv, payment.cvv);
    }

    /// Calendar nights between the dates; 0 when either is missing or
    /// the range is reversed.
    pub fn nights(&self) -> u32 {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => nights_between(check_in, check_out),
            _ => 0,
        }
    }

    /// Nightly price times nights; zero without a room or dates.
    pub fn total(&self) -> Money {
        self.room
            .as_ref()
            .map_or(Money::ZERO, |room| room.price.times(self.nights()))
    }

    pub fn guests(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn room(price: &str) -> Room {
        Room {
            id: 3,
            name: "Deluxe".into(),
            description: String::new(),
            price: price.parse().unwrap(),
            size: None,
            max_occupancy: Some(2),
            amenities: vec![],
            is_active: true,
        }
    }

    #[test]
    fn initial_state() {
        let draft = BookingDraft::default();
        assert_eq!(draft.adults, 1);
        assert_eq!(draft.children, 0);
        assert_eq!(draft.payment.method, PaymentMethod::Card);
        assert_eq!(draft.guest, GuestInfo::default());
        assert_eq!(draft.nights(), 0);
        assert_eq!(draft.total(), Money::ZERO);
    }

    #[test]
    fn guest_fields_merge_key_wise() {
        let mut draft = BookingDraft::default();
        draft.apply(DraftUpdate::new().guest(GuestUpdate {
            first_name: Some("Ama".into()),
            email: Some("ama@example.com".into()),
            ..GuestUpdate::default()
        }));
        draft.apply(DraftUpdate::new().guest(GuestUpdate {
            city: Some("Accra".into()),
            ..GuestUpdate::default()
        }));

        assert_eq!(draft.guest.first_name, "Ama");
        assert_eq!(draft.guest.email, "ama@example.com");
        assert_eq!(draft.guest.city, "Accra");
    }

    #[test]
    fn payment_fields_merge_key_wise() {
        let mut draft = BookingDraft::default();
        draft.apply(DraftUpdate::new().payment(PaymentUpdate {
            card_number: Some(SecretString::from("4111111111111111".to_string())),
            ..PaymentUpdate::default()
        }));
        draft.apply(DraftUpdate::new().payment(PaymentUpdate {
            cvv: Some(SecretString::from("123".to_string())),
            ..PaymentUpdate::default()
        }));

        assert_eq!(draft.payment.card_number.expose_secret(), "4111111111111111");
        assert_eq!(draft.payment.cvv.expose_secret(), "123");
    }

    #[test]
    fn top_level_replace_keep_and_clear() {
        let mut draft = BookingDraft::default();
        draft.apply(
            DraftUpdate::new()
                .room(room("200.00"))
                .dates(date(2024, 6, 1), date(2024, 6, 4))
                .party(2, 1),
        );
        draft.apply(DraftUpdate {
            check_out: Patch::Set(date(2024, 6, 5)),
            ..DraftUpdate::default()
        });
        assert_eq!(draft.check_in, Some(date(2024, 6, 1)));
        assert_eq!(draft.check_out, Some(date(2024, 6, 5)));
        assert_eq!(draft.adults, 2);

        draft.apply(DraftUpdate {
            room: Patch::Clear,
            check_in: Patch::from(None),
            ..DraftUpdate::default()
        });
        assert!(draft.room.is_none());
        assert_eq!(draft.check_in, Some(date(2024, 6, 1)));
    }

    #[test]
    fn nights_and_total() {
        let mut draft = BookingDraft::default();
        draft.apply(
            DraftUpdate::new()
                .room(room("200.00"))
                .dates(date(2024, 6, 1), date(2024, 6, 4)),
        );
        assert_eq!(draft.nights(), 3);
        assert_eq!(draft.total(), Money::from_cents(60_000));

        draft.apply(DraftUpdate::new().dates(date(2024, 6, 4), date(2024, 6, 1)));
        assert_eq!(draft.nights(), 0);
        assert_eq!(draft.total(), Money::ZERO);
    }
}
