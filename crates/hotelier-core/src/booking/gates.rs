// Per-step validation gates. Each returns every failing field of its
// step; an empty result means the step may be left.

use chrono::NaiveDate;
use hotelier_api::{CreateBookingRequest, GuestInfoPayload};
use secrecy::ExposeSecret;

use super::draft::BookingDraft;
use crate::validation::{
    FieldErrors, check_card_number, check_cvv, check_expiry, validate_email, validate_phone,
    validate_required,
};

/// Step 1: room, dates, party.
pub fn check_dates(draft: &BookingDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.room.is_none() {
        errors.add("room", "Please select a room");
    }
    if draft.check_in.is_none() {
        errors.add("check_in", "Please select a check-in date");
    }
    match (draft.check_in, draft.check_out) {
        (_, None) => errors.add("check_out", "Please select a check-out date"),
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            errors.add("check_out", "Check-out date must be after check-in date");
        }
        _ => {}
    }
    if draft.adults < 1 {
        errors.add("adults", "At least one adult is required");
    } else if let Some(room) = draft.room.as_ref().filter(|r| !r.fits(draft.guests())) {
        let max = room.max_occupancy.unwrap_or_default();
        errors.add(
            "adults",
            format!("{} accommodates at most {max} guests", room.name),
        );
    }
    errors
}

/// Step 2: contact details. Postal code is optional.
pub fn check_guest(draft: &BookingDraft) -> FieldErrors {
    let g = &draft.guest;
    let mut errors = FieldErrors::new();

    if !validate_required(&g.first_name) {
        errors.add("first_name", "First name is required");
    }
    if !validate_required(&g.last_name) {
        errors.add("last_name", "Last name is required");
    }
    if !validate_required(&g.email) {
        errors.add("email", "Email is required");
    } else if !validate_email(&g.email) {
        errors.add("email", "Please enter a valid email address");
    }
    if !validate_required(&g.phone) {
        errors.add("phone", "Phone number is required");
    } else if !validate_phone(&g.phone) {
        errors.add("phone", "Please enter a valid phone number");
    }
    if !validate_required(&g.address) {
        errors.add("address", "Address is required");
    }
    if !validate_required(&g.city) {
        errors.add("city", "City is required");
    }
    if !validate_required(&g.country) {
        errors.add("country", "Country is required");
    }
    errors
}

/// Step 3: card details, only for card payments.
pub fn check_payment(draft: &BookingDraft, today: NaiveDate) -> FieldErrors {
    let p = &draft.payment;
    let mut errors = FieldErrors::new();
    if !p.method.requires_card_details() {
        return errors;
    }

    if let Err(msg) = check_card_number(p.card_number.expose_secret()) {
        errors.add("card_number", msg);
    }
    if !validate_required(&p.card_name) {
        errors.add("card_name", "Name on card is required");
    }
    if let Err(msg) = check_expiry(&p.expiry, today) {
        errors.add("expiry", msg);
    }
    if let Err(msg) = check_cvv(p.cvv.expose_secret()) {
        errors.add("cvv", msg);
    }
    errors
}

/// Run every gate and build the creation request.
pub fn build_request(
    draft: &BookingDraft,
    today: NaiveDate,
) -> Result<CreateBookingRequest, FieldErrors> {
    let mut errors = check_dates(draft);
    errors.extend(check_guest(draft));
    errors.extend(check_payment(draft, today));

    let (Some(room), Some(check_in), Some(check_out)) =
        (draft.room.as_ref(), draft.check_in, draft.check_out)
    else {
        return Err(errors);
    };
    errors.into_result()?;

    let g = &draft.guest;
    Ok(CreateBookingRequest {
        room_id: room.id,
        check_in,
        check_out,
        adults: draft.adults,
        children: draft.children,
        special_requests: draft.special_requests.trim().to_owned(),
        guest_info: GuestInfoPayload {
            first_name: g.first_name.trim().to_owned(),
            last_name: g.last_name.trim().to_owned(),
            email: g.email.trim().to_owned(),
            phone: g.phone.trim().to_owned(),
            address: g.address.trim().to_owned(),
            city: g.city.trim().to_owned(),
            country: g.country.trim().to_owned(),
            postal_code: g.postal_code.trim().to_owned(),
        },
    })
}
