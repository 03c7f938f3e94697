//! # folio
//!
//! Command-line client for the Folio library. Each subcommand plays the
//! role of a view: it calls the API through a [`Session`], prints results to
//! stdout, and prints notification banners to stderr.

#![deny(unsafe_code)]

mod commands;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_api::{ApiClient, Followup, Session};
use folio_auth::FileTokenStore;
use folio_core::constants::{NAME, VERSION};
use folio_notify::{Broadcaster, NotificationEvent, NotificationKind};
use tokio::sync::broadcast;

/// Folio command-line client.
#[derive(Parser, Debug)]
#[command(name = NAME, version = VERSION, about = "Browse and read the Folio library")]
struct Cli {
    /// API base URL (overrides settings).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Settings file (default: ~/.folio/settings.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token.
    Login {
        /// Account email.
        email: String,
        /// Password (read from stdin when omitted).
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account; a verification code is emailed.
    Register {
        /// Display name.
        name: String,
        /// Account email.
        email: String,
        /// Password (read from stdin when omitted).
        #[arg(long)]
        password: Option<String>,
    },
    /// Confirm the emailed verification code and log in.
    Verify {
        /// Account email.
        email: String,
        /// Code from the verification email.
        code: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the logged-in account.
    Whoami,
    /// Browse the library.
    Books {
        #[command(subcommand)]
        command: BooksCommand,
    },
    /// Manage favorites.
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Subscription and billing.
    Billing {
        #[command(subcommand)]
        command: BillingCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BooksCommand {
    /// List one page of the library.
    List {
        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search by title or author.
    Search {
        /// Search terms.
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Read a book (preview only for locked books on the free plan).
    Show {
        /// Book ID.
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorited books.
    List,
    /// Add a book to favorites.
    Add {
        /// Book ID.
        id: String,
    },
    /// Remove a book from favorites.
    Remove {
        /// Book ID.
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum BillingCommand {
    /// Get a checkout link for the premium plan.
    Checkout,
    /// Get a link to the billing portal.
    Portal,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => folio_settings::load_settings_from_path(path),
        None => folio_settings::load_settings(),
    }
    .context("Failed to load settings")?;
    if let Some(url) = &cli.api_url {
        settings.api.base_url.clone_from(url);
    }

    let level = if cli.verbose { "debug" } else { settings.logging.level.as_str() };
    folio_core::logging::init_subscriber(level);

    let tokens = Arc::new(FileTokenStore::new(settings.session.token_file.clone()));
    let client = ApiClient::new(&settings.api, tokens).context("Failed to create API client")?;
    let notifier = Broadcaster::new(Duration::from_millis(settings.notifications.ttl_ms));
    let printer = tokio::spawn(print_banners(notifier.subscribe(), std::io::stderr()));
    let session = Session::new(client, notifier);

    let result = commands::run(&session, cli.command).await;
    // Dropping the last sender lets the printer drain what is left and stop.
    drop(session);
    if tokio::time::timeout(Duration::from_secs(1), printer).await.is_err() {
        tracing::debug!("banner printer did not finish");
    }

    let Err(err) = result else {
        return Ok(ExitCode::SUCCESS);
    };
    tracing::debug!(error = %err, "command failed");
    Ok(match Followup::for_error(&err) {
        Followup::RedirectToLogin => {
            eprintln!("Your session has ended. Run `folio login <email>` to sign in again.");
            ExitCode::from(2)
        }
        Followup::OfferUpgrade => {
            eprintln!("Upgrade with `folio billing checkout` to unlock this.");
            ExitCode::from(3)
        }
        Followup::None => ExitCode::FAILURE,
    })
}

/// Write each notification to `out` as it is published, until the
/// broadcaster is dropped.
async fn print_banners(mut rx: broadcast::Receiver<NotificationEvent>, mut out: impl Write) {
    loop {
        match rx.recv().await {
            Ok(NotificationEvent::Published(n)) => {
                let tag = match n.kind {
                    NotificationKind::Success => "ok",
                    NotificationKind::Error => "error",
                };
                let _ = writeln!(out, "[{tag}] {}", n.message);
            }
            Ok(NotificationEvent::Removed { .. }) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "banner printer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
