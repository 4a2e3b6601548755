//! Power Tic-Tac-Toe - terminal shell
//!
//! Plays the power tic-tac-toe engine over stdin/stdout.

#![warn(missing_docs)]

mod cli;
mod render;
mod shell;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, SettingsArgs};
use power_tictactoe::Session;
use shell::Shell;
use std::io;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the board
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Play { settings, json } => run_play(&settings, json),
        Command::ShowConfig { settings } => show_config(&settings),
    }
}

/// Run an interactive game on stdin/stdout
#[instrument(skip(args))]
fn run_play(args: &SettingsArgs, json: bool) -> Result<()> {
    let settings = args.resolve()?;
    info!(size = %settings.size(), mode = ?settings.mode(), "Starting game");

    let session = Session::new(settings)?;
    let mut shell = Shell::new(session, io::stdin().lock(), io::stdout().lock(), json);
    shell.run()?;

    if let Some(outcome) = shell.session().state().outcome() {
        info!(%outcome, "Final result");
    }
    Ok(())
}

/// Print the effective settings as TOML
fn show_config(args: &SettingsArgs) -> Result<()> {
    let settings = args.resolve()?;
    print!("{}", settings.to_toml()?);
    Ok(())
}
