//! keepal - KeePass database helper for Alfred and the command line
//!
//! Adds entries, prints single attributes and searches entry titles.

mod alfred;
mod commands;
mod config;

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commands::Command;
use config::{Config, FileConfig, Overrides, ENV_DATABASE, ENV_KEYFILE, ENV_PASSWORD};

/// keepal - KeePass database helper for Alfred and the command line
#[derive(Parser, Debug)]
#[command(name = "keepal", author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Path to the KeePass database file (overrides config)
    #[arg(short, long, value_name = "FILE", env = ENV_DATABASE, global = true)]
    database: Option<PathBuf>,

    /// Path to the key file (overrides config)
    #[arg(short, long, value_name = "FILE", env = ENV_KEYFILE, global = true)]
    keyfile: Option<PathBuf>,

    /// Master password; prefer the environment variable over the flag
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true, global = true)]
    master_password: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // Logs go to stderr; stdout carries command output. Targets match by
    // prefix, so `keepal` also covers `keepal_core`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("keepal={level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn run(args: Args) -> Result<(), keepal_core::Error> {
    let file = FileConfig::load(args.config.as_deref())
        .map_err(|e| keepal_core::Error::Configuration(format!("{e:#}")))?;

    let overrides = Overrides {
        database_path: args.database,
        keyfile_path: args.keyfile,
        master_password: args.master_password,
    };
    let config = Config::resolve(overrides, file)?;
    tracing::info!("Database path: {}", config.database_path.display());

    args.command.run(&config)
}

fn main() -> ExitCode {
    // A .env file next to the workflow may carry the keepassxc_* variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Error: failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
