//! Clap derive structures for the `hotelier` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use hotelier_core::{Money, PaymentMethod};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hotelier -- browse rooms and book stays from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "hotelier",
    version,
    about = "Browse hotel rooms and manage bookings from the command line",
    long_about = "A command-line client for the hotel booking service.\n\n\
        Search rooms, check availability, walk through the four-step\n\
        booking wizard and manage your reservations.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "HOTELIER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Booking API root (overrides profile)
    #[arg(long, short = 'u', env = "HOTELIER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Account email (overrides profile)
    #[arg(long, env = "HOTELIER_EMAIL", global = true)]
    pub email: Option<String>,

    /// Bearer token to use instead of the stored one
    #[arg(long, env = "HOTELIER_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOTELIER_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "HOTELIER_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HOTELIER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the room catalog
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Check whether a room is free for a stay
    #[command(alias = "avail")]
    Availability(AvailabilityArgs),

    /// Book a room with the step-by-step wizard
    Book(Box<BookArgs>),

    /// View and cancel your bookings
    #[command(alias = "b")]
    Bookings(BookingsArgs),

    /// Sign in and remember the session
    Login(LoginArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROOMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List(RoomListArgs),

    /// Show one room
    Show {
        /// Room ID
        id: u64,
    },
}

#[derive(Debug, Args)]
pub struct RoomListArgs {
    /// Only rooms that fit this many guests
    #[arg(long, short = 'g')]
    pub guests: Option<u32>,

    /// Highest nightly rate, e.g. 250 or 199.99
    #[arg(long)]
    pub max_price: Option<Money>,

    /// Match name, description or amenities
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Include rooms that are not bookable
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AVAILABILITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AvailabilityArgs {
    /// Room ID
    pub room: u64,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: NaiveDate,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Any detail given as a flag is used as-is; the rest is prompted for
/// unless `--no-input` is set.
#[derive(Debug, Args)]
pub struct BookArgs {
    /// Room ID (skips the room picker)
    #[arg(long, short = 'r')]
    pub room: Option<u64>,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: Option<NaiveDate>,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: Option<NaiveDate>,

    #[arg(long)]
    pub adults: Option<u32>,

    #[arg(long)]
    pub children: Option<u32>,

    #[arg(long)]
    pub special_requests: Option<String>,

    #[command(flatten)]
    pub guest: GuestArgs,

    #[command(flatten)]
    pub payment: PaymentArgs,

    /// Never prompt; fail on missing or invalid details
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Guest details")]
pub struct GuestArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long = "guest-email")]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Payment")]
pub struct PaymentArgs {
    /// card, mobile-money or wallet
    #[arg(long = "payment")]
    pub method: Option<PaymentMethod>,
    #[arg(long, hide = true)]
    pub card_number: Option<String>,
    #[arg(long)]
    pub card_name: Option<String>,
    /// MM/YY
    #[arg(long)]
    pub expiry: Option<String>,
    #[arg(long, hide = true)]
    pub cvv: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List your bookings
    #[command(alias = "ls")]
    List,

    /// Show one booking
    Show {
        /// Booking ID
        id: String,
    },

    /// Cancel a booking
    Cancel {
        /// Booking ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Do not store the session token in the system keyring
    #[arg(long)]
    pub no_store: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name shown on bookings
    #[arg(long)]
    pub full_name: Option<String>,

    /// Do not store the session token in the system keyring
    #[arg(long)]
    pub no_store: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, email, password_env, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the account password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
