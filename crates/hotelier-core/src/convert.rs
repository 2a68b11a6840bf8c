// ── Wire record → domain type conversion ──
//
// Status strings are parsed leniently: values this client does not know
// map to `Unknown` rather than failing the whole response.

use hotelier_api::{BookingRecord, RoomRecord, UserRecord};

use crate::error::CoreError;
use crate::model::{
    BookingStatus, GuestInfo, Money, PaymentStatus, Reservation, Room, SettlementMethod, User,
};

impl TryFrom<RoomRecord> for Room {
    type Error = CoreError;

    fn try_from(r: RoomRecord) -> Result<Self, Self::Error> {
        let price: Money = r.price.parse().map_err(|e| CoreError::InvalidResponse {
            message: format!("room {}: {e}", r.id),
        })?;
        Ok(Self {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            price,
            size: r.size,
            max_occupancy: r.max_occupancy,
            amenities: r.amenities,
            is_active: r.is_active,
        })
    }
}

impl TryFrom<BookingRecord> for Reservation {
    type Error = CoreError;

    fn try_from(b: BookingRecord) -> Result<Self, Self::Error> {
        let room = b.room.map(Room::try_from).transpose()?;
        let amount_paid = b
            .amount_paid
            .as_deref()
            .map(str::parse::<Money>)
            .transpose()
            .map_err(|e| CoreError::InvalidResponse {
                message: format!("booking {}: {e}", b.id),
            })?;

        Ok(Self {
            id: b.id,
            reference: b.reference,
            room,
            check_in: b.check_in,
            check_out: b.check_out,
            adults: b.adults,
            children: b.children,
            special_requests: b.special_requests,
            status: b.status.parse().unwrap_or(BookingStatus::Unknown),
            payment_status: b.payment_status.parse().unwrap_or(PaymentStatus::Unknown),
            settlement: b.payment_method.parse().unwrap_or(SettlementMethod::Unknown),
            amount_paid,
            guest: GuestInfo {
                first_name: b.guest_first_name,
                last_name: b.guest_last_name,
                email: b.guest_email,
                phone: b.guest_phone,
                address: b.guest_address,
                city: b.guest_city,
                country: b.guest_country,
                postal_code: b.guest_postal_code,
            },
            created_at: b.created_at,
        })
    }
}

impl From<UserRecord> for User {
    fn from(u: UserRecord) -> Self {
        let mut roles = u.roles;
        if roles.is_empty() && !u.role.is_empty() {
            roles.push(u.role.clone());
        }
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            roles,
            permissions: u.permissions,
        }
    }
}

/// Convert a list of wire records, failing on the first bad one.
pub(crate) fn rooms(records: Vec<RoomRecord>) -> Result<Vec<Room>, CoreError> {
    records.into_iter().map(Room::try_from).collect()
}

pub(crate) fn reservations(records: Vec<BookingRecord>) -> Result<Vec<Reservation>, CoreError> {
    records.into_iter().map(Reservation::try_from).collect()
}
