//! Booking management handlers: list, show, cancel.

use tabled::Tabled;

use hotelier_core::Reservation;

use crate::cli::{BookingsArgs, BookingsCommand};
use crate::error::{CliError, not_found};
use crate::output::{self, Painter};

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Check-out")]
    check_out: String,
    #[tabled(rename = "Nights")]
    nights: u32,
    #[tabled(rename = "Status")]
    status: String,
}

impl BookingRow {
    fn new(b: &Reservation, paint: Painter) -> Self {
        Self {
            id: b.id.clone(),
            reference: b.reference.clone(),
            room: room_name(b),
            check_in: util::opt_date(b.check_in),
            check_out: util::opt_date(b.check_out),
            nights: b.nights(),
            status: paint.status(b.status),
        }
    }
}

fn room_name(b: &Reservation) -> String {
    b.room.as_ref().map(|r| r.name.clone()).unwrap_or_default()
}

pub(super) fn detail(b: &Reservation, paint: Painter) -> String {
    let guests = if b.children > 0 {
        format!("{} adults, {} children", b.adults, b.children)
    } else {
        format!("{} adults", b.adults)
    };
    output::detail_block(&[
        ("Reference", b.reference.clone()),
        ("ID", b.id.clone()),
        ("Room", room_name(b)),
        ("Check-in", util::opt_date(b.check_in)),
        ("Check-out", util::opt_date(b.check_out)),
        ("Nights", b.nights().to_string()),
        ("Guests", guests),
        ("Guest", b.guest.full_name()),
        ("Email", b.guest.email.clone()),
        ("Status", paint.status(b.status)),
        ("Payment", b.payment_status.to_string()),
        ("Paid", b.amount_paid.map(util::price).unwrap_or_default()),
        ("Requests", b.special_requests.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: BookingsArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let paint = ctx.paint;
    match args.command {
        BookingsCommand::List => {
            let bookings = ctx.hotel.my_bookings().await?;
            if bookings.is_empty() {
                ctx.status("You have no bookings yet. Run: hotelier book");
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                &bookings,
                |b| BookingRow::new(b, paint),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Show { id } => {
            let booking = ctx
                .hotel
                .booking(&id)
                .await
                .map_err(|e| not_found(e, "booking", &id, "bookings list"))?;
            let out = output::render_single(
                &global.output,
                &booking,
                |b| detail(b, paint),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Cancel { id } => {
            if !global.yes && !util::interactive() {
                return Err(CliError::NonInteractiveRequiresYes {
                    action: "cancel booking".into(),
                });
            }
            if !util::confirm(&format!("Cancel booking '{id}'?"), global.yes)? {
                return Ok(());
            }
            util::with_spinner(
                "Cancelling booking",
                global.quiet,
                ctx.hotel.cancel_booking(&id),
            )
            .await
            .map_err(|e| not_found(e, "booking", &id, "bookings list"))?;
            ctx.print_notifications();
            Ok(())
        }
    }
}
