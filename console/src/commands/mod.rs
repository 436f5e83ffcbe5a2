//! Subcommands and their handlers.

mod admin;
mod session;

use clap::Subcommand;
use cosign_http::types::RecordStatus;
use cosign_http::{ConsoleApi, NavigationEvent, NavigationReason};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the locally stored session without contacting the server
    Whoami,
    /// Profile of the signed-in user
    UserInfo,
    /// Request the server's half of a co-signature
    Sign {
        /// Base64 client public point
        #[arg(long)]
        q1: String,
        /// Base64 message digest
        #[arg(long)]
        e: String,
    },
    /// Manage keys
    Keys {
        #[command(subcommand)]
        action: KeysCommand,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersCommand,
    },
    /// Query the audit log
    Logs {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// System counters
    Stats,
    /// Service health
    Health,
    /// Show where navigating to a console path would land
    Route { path: String },
}

#[derive(Subcommand)]
pub enum KeysCommand {
    List,
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    List,
    Get { id: String },
    Delete { id: String },
    /// Enable or disable an account
    Status { id: String, status: RecordStatus },
}

pub async fn execute(api: &ConsoleApi, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => session::login(api, &username, &password).await,
        Command::Logout => session::logout(api).await,
        Command::Whoami => session::whoami(api),
        Command::UserInfo => print_json(&api.user_info().await?),
        Command::Route { path } => session::route(api, &path),
        Command::Sign { q1, e } => admin::sign(api, q1, e).await,
        Command::Keys { action } => admin::keys(api, action).await,
        Command::Users { action } => admin::users(api, action).await,
        Command::Logs {
            user_id,
            action,
            limit,
            page,
            page_size,
        } => {
            let query = cosign_http::types::LogQuery {
                user_id,
                action,
                limit,
                page,
                page_size,
            };
            print_json(&api.list_logs(&query).await?)
        }
        Command::Stats => print_json(&api.stats().await?),
        Command::Health => print_json(&api.health().await?),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report view changes until the navigator goes away.
pub fn watch_navigation(mut rx: broadcast::Receiver<NavigationEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => report(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("navigation watcher skipped {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn report(event: &NavigationEvent) {
    match event.reason {
        NavigationReason::SessionInvalidated => {
            eprintln!("session expired, please log in again");
        }
        reason => tracing::debug!("view {} ({:?})", event.to, reason),
    }
}
