//! ptzctl - gimbal and virtual PTZ control CLI
//!
//! Drives a SIYI gimbal over UDP and replays recorded detection sessions
//! through the virtual PTZ engine.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ptzkit_config::PtzkitConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{ConfigCommands, GimbalCommands, PtzCommands};
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "ptzctl")]
#[command(about = "Gimbal and virtual PTZ control - point a SIYI gimbal, replay tracking sessions")]
#[command(version)]
#[command(long_about = "
ptzctl talks to a SIYI A8 Mini class gimbal over its UDP SDK and runs
recorded detection sessions through the virtual PTZ engine.

Settings come from a YAML file (--config or PTZCTL_CONFIG); without one the
built-in defaults are used. Use --json for machine-readable output.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file
    #[arg(long, global = true, env = "PTZCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Gimbal attitude and pointing commands
    #[command(subcommand)]
    Gimbal(GimbalCommands),

    /// Virtual PTZ commands
    #[command(subcommand)]
    Ptz(PtzCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ptzctl={log_level},ptzkit_gimbal_link={log_level},ptzkit_virtual_ptz={log_level},ptzkit_config={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(error: &anyhow::Error) -> u8 {
    error.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

fn load_config(path: Option<&PathBuf>) -> Result<(PtzkitConfig, String)> {
    let loaded = match path {
        Some(path) => ptzkit_config::load_from_path(path).map(|c| (c, path.display().to_string())),
        None => ptzkit_config::load_default().map(|c| (c, "built-in defaults".to_string())),
    };
    Ok(loaded.map_err(CliError::from)?)
}

async fn execute_command(cli: &Cli) -> Result<()> {
    let (config, source) = load_config(cli.config.as_ref())?;
    match &cli.command {
        Commands::Gimbal(cmd) => commands::gimbal::execute(cmd, &config, cli.json).await,
        Commands::Ptz(cmd) => commands::ptz::execute(cmd, &config, cli.json).await,
        Commands::Config(cmd) => commands::config::execute(cmd, &config, &source, cli.json).await,
    }
}
