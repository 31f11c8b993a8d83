//! isoshelf entry point.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "isoshelf",
    version,
    about = "Browse for game images and remember their source directories"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory (defaults to the configured start directory)
    Ls {
        dir: Option<PathBuf>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Activate an entry of a directory listing by index
    Open {
        dir: PathBuf,
        index: usize,

        /// Print a resulting listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a directory as a source directory
    Add { dir: PathBuf },
    /// Print the registered source directories
    Sources,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::config_path);
    let config = config::Config::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    match cli.command {
        Command::Ls { dir, json } => commands::ls(&config, dir, json),
        Command::Open { dir, index, json } => commands::open(&config, &dir, index, json),
        Command::Add { dir } => commands::add(&config, &dir),
        Command::Sources => commands::sources(&config),
    }
}
