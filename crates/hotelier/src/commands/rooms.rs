//! Room catalog command handlers.

use tabled::Tabled;

use hotelier_core::{Room, RoomQuery};

use crate::cli::{RoomListArgs, RoomsArgs, RoomsCommand};
use crate::error::{CliError, not_found};
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Per night")]
    price: String,
    #[tabled(rename = "Guests")]
    guests: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Amenities")]
    amenities: String,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            price: util::price(r.price),
            guests: util::occupancy(r.max_occupancy),
            size: r.size.clone().unwrap_or_default(),
            amenities: r.amenities.join(", "),
        }
    }
}

pub(super) fn detail(room: &Room) -> String {
    output::detail_block(&[
        ("ID", room.id.to_string()),
        ("Name", room.name.clone()),
        ("Per night", util::price(room.price)),
        ("Guests", util::occupancy(room.max_occupancy)),
        ("Size", room.size.clone().unwrap_or_default()),
        ("Amenities", room.amenities.join(", ")),
        ("Bookable", if room.is_active { "yes" } else { "no" }.into()),
        ("About", room.description.clone()),
    ])
}

fn query(args: RoomListArgs) -> RoomQuery {
    RoomQuery {
        guests: args.guests,
        max_price: args.max_price,
        search: args.search,
        include_inactive: args.all,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: RoomsArgs) -> Result<(), CliError> {
    let global = ctx.global;
    match args.command {
        RoomsCommand::List(list) => {
            let rooms = ctx.hotel.rooms(&query(list)).await?;
            if rooms.is_empty() {
                ctx.status("No rooms match your filters");
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                &rooms,
                |r| RoomRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Show { id } => {
            let room = ctx
                .hotel
                .room(id)
                .await
                .map_err(|e| not_found(e, "room", &id.to_string(), "rooms list"))?;
            let out = output::render_single(&global.output, &room, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
