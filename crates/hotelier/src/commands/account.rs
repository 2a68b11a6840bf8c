//! Login, registration and session handlers.

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use hotelier_core::validation::validate_email;
use hotelier_core::{LandingView, User};

use crate::cli::{LoginArgs, RegisterArgs};
use crate::config;
use crate::error::{CliError, prompt_err};
use crate::output;

use super::Ctx;

fn user_detail(user: &User) -> String {
    output::detail_block(&[
        ("Email", user.email.clone()),
        ("Name", user.full_name.clone()),
        ("Role", user.primary_role().to_string()),
        ("Permissions", user.permissions.join(", ")),
    ])
}

fn print_user(ctx: &Ctx<'_>, user: &User) {
    let out = output::render_single(&ctx.global.output, user, user_detail, |u| u.email.clone());
    output::print_output(&out, ctx.global.quiet);
}

/// Keep the issued token for later runs unless told otherwise.
fn remember(ctx: &Ctx<'_>, no_store: bool) {
    if no_store {
        return;
    }
    let Some(token) = ctx.hotel.session().token() else {
        return;
    };
    match hotelier_config::store_token(&ctx.profile_name, &token) {
        Ok(()) => tracing::debug!(profile = %ctx.profile_name, "session token stored"),
        Err(e) => ctx.status(&format!("warning: session not remembered: {e}")),
    }
}

/// Point the user at where their role starts.
fn landing_hint(ctx: &Ctx<'_>) {
    let Some(view) = ctx.hotel.session().landing_view() else {
        return;
    };
    tracing::debug!(path = view.path(), "landing view");
    let hint = match view {
        LandingView::MyBookings => "See your bookings: hotelier bookings list",
        LandingView::Admin | LandingView::Reception => "Signed in with staff access",
    };
    ctx.status(&ctx.paint.dim(hint));
}

pub async fn login(ctx: &Ctx<'_>, args: LoginArgs) -> Result<(), CliError> {
    let creds = config::login_credentials(&ctx.config, &ctx.profile, &ctx.profile_name, ctx.global)?;
    let user = ctx
        .hotel
        .session()
        .login(&creds.email, &creds.password)
        .await
        .map_err(|e| match CliError::from(e) {
            CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                message,
                profile: ctx.profile_name.clone(),
            },
            other => other,
        })?;

    remember(ctx, args.no_store);
    landing_hint(ctx);
    ctx.status(&format!(
        "{} Signed in as {}",
        ctx.paint.success("✓"),
        user.email
    ));
    Ok(())
}

pub async fn register(ctx: &Ctx<'_>, args: RegisterArgs) -> Result<(), CliError> {
    let email = match ctx.global.email.clone().or_else(|| ctx.profile.email.clone()) {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    if !validate_email(email.trim()) {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "Please enter a valid email address".into(),
        });
    }
    let full_name = match args.full_name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Full name")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match hotelier_config::resolve_password(&ctx.profile, &ctx.profile_name) {
        Some(pw) => pw,
        None => {
            let first = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            let again = rpassword::prompt_password("Repeat password: ").map_err(prompt_err)?;
            if first != again {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "passwords do not match".into(),
                });
            }
            SecretString::from(first)
        }
    };
    if password.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    let user = ctx
        .hotel
        .session()
        .register(email.trim(), &password, full_name.trim())
        .await?;

    remember(ctx, args.no_store);
    landing_hint(ctx);
    ctx.status(&format!(
        "{} Account created for {}",
        ctx.paint.success("✓"),
        user.email
    ));
    Ok(())
}

pub fn logout(ctx: &Ctx<'_>) {
    ctx.hotel.session().logout();
    if let Err(e) = hotelier_config::delete_token(&ctx.profile_name) {
        tracing::warn!(error = %e, "could not remove stored token");
    }
    ctx.status(&format!("{} Signed out", ctx.paint.success("✓")));
}

pub async fn whoami(ctx: &Ctx<'_>) -> Result<(), CliError> {
    if !ctx.hotel.session().is_authenticated() {
        return Err(CliError::LoginRequired);
    }
    let user = ctx.hotel.session().current_user().await?;
    print_user(ctx, &user);
    Ok(())
}
