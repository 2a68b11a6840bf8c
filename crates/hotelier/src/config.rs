//! CLI configuration: thin wrapper around `hotelier_config`.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `GlobalOpts` flag overrides (--api-url, --email, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use hotelier_core::{ClientConfig, Credentials, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hotelier_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile. An explicitly requested profile must exist; the
/// implicit default falls back to built-in settings so the CLI works
/// against a local backend without any config file.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            available: config.profile_names(),
            name,
        }),
        None => Ok((name, Profile::default())),
    }
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// Flag values take priority over profile values; the bearer token comes
/// from `--token` or the keyring entry written by `hotelier login`.
pub fn resolve_client_config(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<ClientConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref email) = global.email {
        profile.email = Some(email.clone());
    }

    let mut config = hotelier_config::profile_transport(&profile)?;

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    let secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);
    config.timeout = Duration::from_secs(secs);

    config.credentials = hotelier_config::resolve_credentials(&profile, profile_name).ok();
    config.token = match global.token {
        Some(ref token) => Some(SecretString::from(token.clone())),
        None => hotelier_config::load_token(profile_name),
    };

    Ok(config)
}

/// Credentials for an interactive login: configured values first, then
/// prompts for whatever is missing.
pub fn login_credentials(
    config: &ClientConfig,
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Credentials, CliError> {
    if let Some(ref creds) = config.credentials {
        return Ok(creds.clone());
    }

    let email = match global.email.clone().or_else(|| profile.email.clone()) {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(crate::error::prompt_err)?,
    };
    let password = match hotelier_config::resolve_password(profile, profile_name) {
        Some(pw) => pw,
        None => SecretString::from(
            rpassword::prompt_password("Password: ").map_err(crate::error::prompt_err)?,
        ),
    };
    Ok(Credentials { email, password })
}
