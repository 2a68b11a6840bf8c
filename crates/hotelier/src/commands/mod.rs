//! Command handlers and the shared context they run in.

pub mod account;
pub mod availability;
pub mod book;
pub mod bookings;
pub mod config_cmd;
pub mod rooms;
pub mod util;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use hotelier_config::Profile;
use hotelier_core::flags::REFRESH_INTERVAL;
use hotelier_core::{AuthEvent, ClientConfig, Hotel, Tracker, TracingSink};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output::Painter;

/// Analytics events buffered before new ones are dropped.
const ANALYTICS_BUFFER: usize = 64;

/// Everything a handler needs: the connected hotel facade, the flags it
/// was invoked with and the profile it resolved.
pub struct Ctx<'a> {
    pub hotel: Hotel,
    pub global: &'a GlobalOpts,
    pub profile_name: String,
    pub profile: Profile,
    pub config: ClientConfig,
    pub paint: Painter,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl<'a> Ctx<'a> {
    pub fn connect(
        global: &'a GlobalOpts,
        profile_name: String,
        profile: Profile,
        config: ClientConfig,
    ) -> Result<Self, CliError> {
        let cancel = CancellationToken::new();
        let (tracker, analytics) =
            Tracker::spawn(Arc::new(TracingSink), ANALYTICS_BUFFER, cancel.clone());

        let hotel = Hotel::connect(&config)?.with_tracker(tracker);
        let mut tasks = spawn_services(&hotel, &cancel);
        tasks.push(analytics);

        Ok(Self {
            hotel,
            global,
            profile_name,
            profile,
            config,
            paint: Painter::new(&global.color),
            cancel,
            tasks,
        })
    }

    /// Stop background tasks. A token the server rejected during this run
    /// is dropped from the keyring so the next run asks for a login.
    pub async fn shutdown(self) {
        if *self.hotel.session().events().borrow() == AuthEvent::LoginRequired
            && self.global.token.is_none()
        {
            if let Err(e) = hotelier_config::delete_token(&self.profile_name) {
                tracing::debug!(error = %e, "could not remove stale token");
            }
        }
        self.cancel.cancel();
        for task in self.tasks {
            let _ = task.await;
        }
    }

    /// Show and clear pending notifications.
    pub fn print_notifications(&self) {
        let notifications = self.hotel.notifications();
        for n in notifications.list() {
            self.status(&self.paint.notice(n.kind, &n.message));
        }
        notifications.clear_all();
    }

    /// Print a status line to stderr unless `--quiet`.
    pub fn status(&self, line: &str) {
        if !self.global.quiet {
            eprintln!("{line}");
        }
    }
}

/// Session watcher and feature-flag poller, both stopped by `cancel`.
fn spawn_services(hotel: &Hotel, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
    vec![
        hotel.session().spawn_watcher(cancel.clone()),
        hotel.flags().spawn_polling(REFRESH_INTERVAL, cancel.clone()),
    ]
}

pub async fn dispatch(cmd: Command, ctx: &Ctx<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Rooms(args) => rooms::handle(ctx, args).await,
        Command::Availability(args) => availability::handle(ctx, args).await,
        Command::Book(args) => book::handle(ctx, *args).await,
        Command::Bookings(args) => bookings::handle(ctx, args).await,
        Command::Login(args) => account::login(ctx, args).await,
        Command::Register(args) => account::register(ctx, args).await,
        Command::Logout => {
            account::logout(ctx);
            Ok(())
        }
        Command::Whoami => account::whoami(ctx).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before connecting"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use hotelier_core::DEFAULT_API_URL;
    use url::Url;

    use super::*;

    #[tokio::test]
    async fn services_refresh_flags_and_stop_on_cancel() {
        let config = ClientConfig::new(Url::parse(DEFAULT_API_URL).unwrap());
        let hotel = Hotel::connect(&config).unwrap();
        assert!(hotel.flags().last_fetched().is_none());

        let cancel = CancellationToken::new();
        let tasks = spawn_services(&hotel, &cancel);
        assert_eq!(tasks.len(), 2);

        // The poller refreshes once immediately.
        for _ in 0..50 {
            if hotel.flags().last_fetched().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(hotel.flags().last_fetched().is_some());

        cancel.cancel();
        for task in tasks {
            tokio::time::timeout(Duration::from_secs(1), task)
                .await
                .unwrap()
                .unwrap();
        }
    }
}
