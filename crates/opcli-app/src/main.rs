//! opcli-signin: register credential-manager accounts by driving its
//! interactive signin.

mod cli;
mod commands;
mod prompt;
mod state;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};
use state::AppState;

/// Initialize the tracing subscriber for logging.
///
/// Library crates log through the `log` facade; the subscriber picks those
/// records up as well. Use RUST_LOG to raise the level (e.g. RUST_LOG=debug).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => state::default_base_dir()?,
    };
    let mut state = AppState::open(&base_dir, cli.op)?;

    match cli.command {
        Command::Accounts => commands::list_accounts(&state),
        Command::Registered => commands::list_registered(&state),
        Command::Add {
            url,
            email,
            account_key,
        } => commands::add_account(&mut state, url, email, account_key).await,
        Command::Remove { id } => commands::remove_account(&mut state, &id),
        Command::SetOp { path } => commands::set_op(&state, &path),
    }
}
