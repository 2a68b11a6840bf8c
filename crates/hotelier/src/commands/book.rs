//! The booking wizard.
//!
//! Drives a `BookingFlow` through its steps. Details given as flags seed
//! the draft; in interactive mode every step is then prompted (with the
//! draft's values as defaults) and re-prompted for the fields its gate
//! rejects. From the guest and payment steps the user may go back; the
//! earlier step is prompted again with everything entered so far. With
//! `--no-input` the first rejected step ends the command.

use chrono::{Days, NaiveDate};
use dialoguer::{Input, Password, Select};
use secrecy::{ExposeSecret, SecretString};
use strum::IntoEnumIterator;

use hotelier_core::validation::{
    card_digits, format_card_number, format_expiry, validate_future_date,
};
use hotelier_core::{
    AnalyticsEvent, BookingBackend, BookingDraft, BookingFlow, BookingSummary, DraftUpdate,
    FieldErrors, FlowError, GuestUpdate, PaymentMethod, PaymentUpdate, RoomQuery, SubmitOutcome,
};

use crate::cli::BookArgs;
use crate::error::{CliError, not_found, prompt_err};
use crate::output;

use super::{Ctx, bookings, util};

// ── Seeding from flags ──────────────────────────────────────────────

fn seed(args: &BookArgs) -> DraftUpdate {
    let mut update = DraftUpdate::new();
    if let Some(d) = args.check_in {
        update.check_in = Some(d).into();
    }
    if let Some(d) = args.check_out {
        update.check_out = Some(d).into();
    }
    update.adults = args.adults;
    update.children = args.children;
    update.special_requests.clone_from(&args.special_requests);

    let g = &args.guest;
    update.guest = GuestUpdate {
        first_name: g.first_name.clone(),
        last_name: g.last_name.clone(),
        email: g.email.clone(),
        phone: g.phone.clone(),
        address: g.address.clone(),
        city: g.city.clone(),
        country: g.country.clone(),
        postal_code: g.postal_code.clone(),
    };

    let p = &args.payment;
    update.payment = PaymentUpdate {
        method: p.method,
        card_number: p.card_number.clone().map(SecretString::from),
        card_name: p.card_name.clone(),
        expiry: p.expiry.as_deref().map(format_expiry),
        cvv: p.cvv.clone().map(SecretString::from),
    };
    update
}

/// Prefill contact details from the signed-in account.
async fn prefill_from_account(ctx: &Ctx<'_>) -> Option<GuestUpdate> {
    if !ctx.hotel.session().is_authenticated() {
        return None;
    }
    let user = ctx.hotel.session().current_user().await.ok()?;
    let mut names = user.full_name.split_whitespace();
    let first = names.next().map(str::to_owned);
    let last = names.collect::<Vec<_>>().join(" ");
    Some(GuestUpdate {
        first_name: first,
        last_name: (!last.is_empty()).then_some(last),
        email: Some(user.email),
        ..GuestUpdate::default()
    })
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Which fields a step prompts for: all of them on the first visit,
/// only the rejected ones afterwards.
#[derive(Clone, Copy)]
enum Ask<'e> {
    All,
    Only(&'e FieldErrors),
}

impl Ask<'_> {
    fn wants(self, field: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(errors) => errors.contains(field),
        }
    }
}

/// Where to go from the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Continue,
    Back,
}

/// Move the flow one step. Going back never drops entered details.
fn navigate<B: BookingBackend>(flow: &BookingFlow<B>, nav: Nav) -> Result<u8, FlowError> {
    match nav {
        Nav::Continue => flow.advance(),
        Nav::Back => flow.retreat(),
    }
}

fn ask_nav(previous_step: u8) -> Result<Nav, CliError> {
    let choices = ["Continue".to_owned(), format!("Back to step {previous_step}")];
    let choice = Select::new()
        .with_prompt("Next")
        .items(&choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(if choice == 1 { Nav::Back } else { Nav::Continue })
}

fn not_in_past(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if validate_future_date(date, today) {
        Ok(())
    } else {
        Err("Please select a future date")
    }
}

fn text(prompt: &str, current: &str, allow_empty: bool) -> Result<String, CliError> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(allow_empty);
    if !current.is_empty() {
        input = input.default(current.to_owned());
    }
    input.interact_text().map_err(prompt_err)
}

/// Prompt for a date; with `earliest`, earlier dates are re-asked.
fn date(
    prompt: &str,
    current: Option<NaiveDate>,
    fallback: NaiveDate,
    earliest: Option<NaiveDate>,
) -> Result<NaiveDate, CliError> {
    let mut input = Input::<NaiveDate>::new()
        .with_prompt(format!("{prompt} (YYYY-MM-DD)"))
        .default(current.unwrap_or(fallback));
    if let Some(today) = earliest {
        input = input.validate_with(move |d: &NaiveDate| not_in_past(*d, today));
    }
    input.interact_text().map_err(prompt_err)
}

fn count(prompt: &str, current: u32) -> Result<u32, CliError> {
    Input::<u32>::new()
        .with_prompt(prompt)
        .default(current)
        .interact_text()
        .map_err(prompt_err)
}

fn secret(prompt: &str) -> Result<SecretString, CliError> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map(SecretString::from)
        .map_err(prompt_err)
}

async fn pick_room<B: BookingBackend>(ctx: &Ctx<'_>, flow: &BookingFlow<B>) -> Result<(), CliError> {
    let rooms = ctx.hotel.rooms(&RoomQuery::default()).await?;
    if rooms.is_empty() {
        return Err(CliError::Rejected {
            message: "No rooms are open for booking".into(),
        });
    }
    let labels: Vec<String> = rooms
        .iter()
        .map(|r| {
            format!(
                "{}  {}/night  up to {} guests",
                r.name,
                util::price(r.price),
                util::occupancy(r.max_occupancy)
            )
        })
        .collect();
    let choice = Select::new()
        .with_prompt("Room")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    if let Some(room) = rooms.into_iter().nth(choice) {
        flow.update_draft(DraftUpdate::new().room(room));
    }
    Ok(())
}

fn prompt_stay(draft: &BookingDraft, today: NaiveDate, ask: Ask<'_>) -> Result<DraftUpdate, CliError> {
    let mut update = DraftUpdate::new();
    let tomorrow = today + Days::new(1);

    let check_in = if ask.wants("check_in") {
        let d = date("Check-in", draft.check_in, tomorrow, Some(today))?;
        update.check_in = Some(d).into();
        Some(d)
    } else {
        draft.check_in
    };
    if ask.wants("check_out") {
        let after = check_in.unwrap_or(today) + Days::new(1);
        let d = date("Check-out", draft.check_out.filter(|d| *d >= after), after, None)?;
        update.check_out = Some(d).into();
    }
    if ask.wants("adults") {
        update.adults = Some(count("Adults", draft.adults)?);
        update.children = Some(count("Children", draft.children)?);
    }
    if matches!(ask, Ask::All) {
        update.special_requests = Some(text("Special requests", &draft.special_requests, true)?);
    }
    Ok(update)
}

fn prompt_guest(draft: &BookingDraft, ask: Ask<'_>) -> Result<DraftUpdate, CliError> {
    let g = &draft.guest;
    let field = |name: &str, prompt: &str, current: &str, optional: bool| -> Result<Option<String>, CliError> {
        if ask.wants(name) {
            text(prompt, current, optional).map(Some)
        } else {
            Ok(None)
        }
    };
    let guest = GuestUpdate {
        first_name: field("first_name", "First name", &g.first_name, false)?,
        last_name: field("last_name", "Last name", &g.last_name, false)?,
        email: field("email", "Email", &g.email, false)?,
        phone: field("phone", "Phone", &g.phone, false)?,
        address: field("address", "Address", &g.address, false)?,
        city: field("city", "City", &g.city, false)?,
        country: field("country", "Country", &g.country, false)?,
        postal_code: field("postal_code", "Postal code (optional)", &g.postal_code, true)?,
    };
    Ok(DraftUpdate::new().guest(guest))
}

fn prompt_payment(ctx: &Ctx<'_>, draft: &BookingDraft, ask: Ask<'_>) -> Result<DraftUpdate, CliError> {
    let mut payment = PaymentUpdate::default();

    let method = if matches!(ask, Ask::All) {
        let methods = offered_methods(ctx);
        let labels: Vec<&str> = methods.iter().map(|m| m.label()).collect();
        let current = methods.iter().position(|m| *m == draft.payment.method).unwrap_or(0);
        let choice = Select::new()
            .with_prompt("Payment method")
            .items(&labels)
            .default(current)
            .interact()
            .map_err(prompt_err)?;
        let method = methods.get(choice).copied().unwrap_or_default();
        payment.method = Some(method);
        method
    } else {
        draft.payment.method
    };

    if method.requires_card_details() {
        if ask.wants("card_number") {
            payment.card_number = Some(secret("Card number")?);
        }
        if ask.wants("card_name") {
            payment.card_name = Some(text("Name on card", &draft.payment.card_name, false)?);
        }
        if ask.wants("expiry") {
            payment.expiry = Some(format_expiry(&text("Expiry (MM/YY)", &draft.payment.expiry, false)?));
        }
        if ask.wants("cvv") {
            payment.cvv = Some(secret("CVV")?);
        }
    }
    Ok(DraftUpdate::new().payment(payment))
}

/// Redirect wallets are offered only while a wallet flag is on.
fn offered_methods(ctx: &Ctx<'_>) -> Vec<PaymentMethod> {
    let wallets = ctx.hotel.flags().any_enabled(&["applePay", "googlePay"]);
    PaymentMethod::iter()
        .filter(|m| wallets || *m != PaymentMethod::Wallet)
        .collect()
}

fn show_errors(ctx: &Ctx<'_>, errors: &FieldErrors) {
    for (_, msg) in errors.iter() {
        ctx.status(&format!("  {} {msg}", ctx.paint.error("✗")));
    }
}

// ── Summary ─────────────────────────────────────────────────────────

fn summary_detail(s: &BookingSummary, draft: &BookingDraft) -> String {
    let card = if draft.payment.method.requires_card_details() {
        let digits = card_digits(draft.payment.card_number.expose_secret());
        let tail: String = digits.chars().skip(digits.len().saturating_sub(4)).collect();
        format!(" ending {}", format_card_number(&tail))
    } else {
        String::new()
    };
    output::detail_block(&[
        ("Room", s.room.clone().unwrap_or_default()),
        ("Check-in", s.check_in.clone()),
        ("Check-out", s.check_out.clone()),
        ("Guests", format!("{} adults, {} children", s.adults, s.children)),
        ("Nights", s.nights.to_string()),
        ("Per night", util::price(s.nightly_rate)),
        ("Total", util::price(s.total)),
        ("Guest", draft.guest.full_name()),
        ("Payment", format!("{}{card}", draft.payment.method.label())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(ctx: &Ctx<'_>, args: BookArgs) -> Result<(), CliError> {
    let interactive = !args.no_input && util::interactive();
    let today = ctx.hotel.today();
    let flow = ctx.hotel.booking_flow();
    ctx.hotel.tracker().track(AnalyticsEvent::page_view("/booking"));

    // Room: direct link, picker, or left for the step gate to report
    match args.room {
        Some(id) => {
            ctx.hotel
                .hydrate_room(&flow, id)
                .await
                .map_err(|e| not_found(e, "room", &id.to_string(), "rooms list"))?;
        }
        None if interactive => pick_room(ctx, &flow).await?,
        None => {}
    }

    if let Some(prefill) = prefill_from_account(ctx).await {
        flow.update_draft(DraftUpdate::new().guest(prefill));
    }
    flow.update_draft(seed(&args));

    // Steps 1-3
    let mut rejected: Option<FieldErrors> = None;
    loop {
        let step = flow.step();
        if interactive {
            let ask = rejected.as_ref().map_or(Ask::All, Ask::Only);
            if rejected.is_none() {
                ctx.status(&ctx.paint.heading(&format!("Step {step} of 4: {}", flow.stage().title())));
                if step > 1 && ask_nav(step - 1)? == Nav::Back {
                    navigate(&flow, Nav::Back)?;
                    continue;
                }
            }
            let draft = flow.draft();
            let update = match step {
                1 => prompt_stay(&draft, today, ask)?,
                2 => prompt_guest(&draft, ask)?,
                _ => prompt_payment(ctx, &draft, ask)?,
            };
            flow.update_draft(update);
        }

        match navigate(&flow, Nav::Continue) {
            Ok(_) => rejected = None,
            Err(FlowError::SubmissionRequired) => break,
            Err(FlowError::Validation(errors)) if interactive => {
                show_errors(ctx, &errors);
                rejected = Some(errors);
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Review
    let draft = flow.draft();
    let summary = flow.summary();
    if interactive {
        ctx.status(&ctx.paint.heading("Review your booking"));
        ctx.status(&summary_detail(&summary, &draft));
        let prompt = format!("Confirm booking for {}?", util::price(summary.total));
        if !util::confirm(&prompt, ctx.global.yes)? {
            flow.reset();
            return Err(CliError::Cancelled);
        }
    }
    ctx.hotel
        .tracker()
        .track(AnalyticsEvent::button_click("confirm_booking"));

    // Submit; the draft survives a refusal so the user can retry
    let reservation = loop {
        let outcome = util::with_spinner("Submitting booking", ctx.global.quiet, flow.submit()).await;
        match outcome {
            Ok(SubmitOutcome::Created(reservation)) => break reservation,
            Ok(SubmitOutcome::AlreadyInFlight | SubmitOutcome::Discarded) => {
                return Err(CliError::Internal("booking submission was interrupted".into()));
            }
            Err(FlowError::Submission { .. }) if interactive => {
                ctx.print_notifications();
                if !util::confirm("Try again?", false)? {
                    return Err(CliError::Cancelled);
                }
            }
            Err(e) => {
                ctx.hotel.notifications().clear_all();
                return Err(e.into());
            }
        }
    };

    ctx.hotel
        .tracker()
        .track(AnalyticsEvent::form_submission("booking"));
    ctx.print_notifications();
    let paint = ctx.paint;
    let out = output::render_single(
        &ctx.global.output,
        &reservation,
        |r| {
            let mut detail = bookings::detail(r, paint);
            if r.room.is_none() {
                detail.push_str(&format!("\n{}", summary_detail(&summary, &draft)));
            }
            detail
        },
        |r| r.reference.clone(),
    );
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use url::Url;

    use hotelier_core::{ClientConfig, DEFAULT_API_URL, Hotel, Money, Room};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flow() -> BookingFlow<impl BookingBackend> {
        let config = ClientConfig::new(Url::parse(DEFAULT_API_URL).unwrap());
        Hotel::connect(&config).unwrap().booking_flow()
    }

    fn suite() -> Room {
        Room {
            id: 2,
            name: "Deluxe Double".into(),
            description: String::new(),
            price: Money::from_cents(20_000),
            size: None,
            max_occupancy: Some(3),
            amenities: Vec::new(),
            is_active: true,
        }
    }

    fn guest() -> GuestUpdate {
        GuestUpdate {
            first_name: Some("Ama".into()),
            last_name: Some("Mensah".into()),
            email: Some("ama@example.com".into()),
            phone: Some("0201234567".into()),
            address: Some("1 Ring Road".into()),
            city: Some("Accra".into()),
            country: Some("Ghana".into()),
            postal_code: None,
        }
    }

    #[test]
    fn going_back_keeps_entered_details() {
        let flow = flow();
        flow.update_draft(
            DraftUpdate::new()
                .room(suite())
                .dates(date(2030, 6, 1), date(2030, 6, 4))
                .party(2, 1)
                .special_requests("Late arrival"),
        );
        assert_eq!(navigate(&flow, Nav::Continue), Ok(2));
        flow.update_draft(DraftUpdate::new().guest(guest()));
        assert_eq!(navigate(&flow, Nav::Continue), Ok(3));
        let entered = flow.draft();

        assert_eq!(navigate(&flow, Nav::Back), Ok(2));
        assert_eq!(navigate(&flow, Nav::Back), Ok(1));
        assert_eq!(flow.draft(), entered);

        // Forward again without re-entering anything.
        assert_eq!(navigate(&flow, Nav::Continue), Ok(2));
        assert_eq!(navigate(&flow, Nav::Continue), Ok(3));
        let draft = flow.draft();
        assert_eq!(draft.guest.full_name(), "Ama Mensah");
        assert_eq!(draft.special_requests, "Late arrival");
        assert_eq!(flow.compute_total(), Money::from_cents(60_000));
    }

    #[test]
    fn back_from_first_step_stays_put() {
        let flow = flow();
        assert_eq!(navigate(&flow, Nav::Back), Ok(1));
        assert_eq!(flow.step(), 1);
    }

    #[test]
    fn check_in_prompt_rejects_past_dates() {
        let today = date(2030, 5, 20);
        assert_eq!(not_in_past(date(2030, 5, 19), today), Err("Please select a future date"));
        assert_eq!(not_in_past(today, today), Ok(()));
        assert_eq!(not_in_past(date(2030, 6, 1), today), Ok(()));
    }

    #[test]
    fn flag_seeding_normalizes_expiry_and_keeps_guest() {
        let args = crate::cli::Cli::try_parse_from([
            "hotelier", "book", "--first-name", "Ama", "--expiry", "1229", "--adults", "2",
        ])
        .unwrap();
        let crate::cli::Command::Book(args) = args.command else {
            panic!("expected book");
        };
        let update = seed(&args);
        assert_eq!(update.guest.first_name.as_deref(), Some("Ama"));
        assert_eq!(update.payment.expiry.as_deref(), Some("12/29"));
        assert_eq!(update.adults, Some(2));
    }
}
