//! Availability check handler.

use serde::Serialize;

use crate::cli::AvailabilityArgs;
use crate::error::{CliError, not_found};
use crate::output;

use super::{Ctx, util};

#[derive(Serialize)]
struct Availability {
    room: u64,
    check_in: chrono::NaiveDate,
    check_out: chrono::NaiveDate,
    available: bool,
}

pub async fn handle(ctx: &Ctx<'_>, args: AvailabilityArgs) -> Result<(), CliError> {
    let available = ctx
        .hotel
        .check_availability(args.room, args.check_in, args.check_out)
        .await
        .map_err(|e| not_found(e, "room", &args.room.to_string(), "rooms list"))?;

    let result = Availability {
        room: args.room,
        check_in: args.check_in,
        check_out: args.check_out,
        available,
    };
    let paint = ctx.paint;
    let out = output::render_single(
        &ctx.global.output,
        &result,
        |a| {
            let range = format!("{} to {}", util::long_date(a.check_in), util::long_date(a.check_out));
            if a.available {
                format!("{} Room {} is available {range}", paint.success("✓"), a.room)
            } else {
                format!("{} Room {} is not available {range}", paint.error("✗"), a.room)
            }
        },
        |a| a.available.to_string(),
    );
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
