//! log-window - rolling console log window demo
//!
//! Runs a scripted log producer against a ringlog-backed window and prints
//! what the window retained.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use log_window::{LogLevel, WindowConfig, logging_builder, run_session};

#[derive(Parser)]
#[command(
    name = "log-window",
    about = "Rolling console log window backed by ring buffers",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Path to a TOML window config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the producer and print the retained window
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,

        /// Remove entries at this level after the run (info, warning, error)
        #[arg(short, long)]
        drop: Option<LogLevel>,

        /// Print every retained entry instead of only the recent lines
        #[arg(long)]
        all: bool,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => WindowConfig::load(path)?,
        None => WindowConfig::default(),
    };

    let _guard = logging_builder(&config, cli.verbose, cli.json).init()?;

    match cli.command {
        Commands::Run { frames, drop, all } => {
            let window = run_session(&config, frames, drop);
            let stats = window.stats();
            let (infos, warnings, errors) = window.level_counts();

            info!(
                frames,
                retained = window.len(),
                received = stats.received,
                collapsed = stats.collapsed,
                evicted = stats.evicted,
                dropped = stats.dropped,
                infos,
                warnings,
                errors,
                "Session finished"
            );

            if all {
                for line in window.lines() {
                    println!("{}", line);
                }
            } else {
                for line in window.recent() {
                    println!("{}", line);
                }
            }
        }
        Commands::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
