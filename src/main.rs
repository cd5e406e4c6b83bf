//! MStyle CLI
//!
//! Developer surface over the media style codecs.
//!
//! # Usage
//!
//! ```bash
//! mstyle classify 'imageView2/1/w/240/h/180'
//! mstyle parse '$0.mp4?avthumb/gif/ss/0.1/s/100x100/t/5/autoscale/2'
//! mstyle file-key 1.jpg --style small.jpg --commands '$0.jpg?imageView2/1/w/240'
//! mstyle batch styles.yaml --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use mstyle::cli::{commands, Cli, Commands};
use mstyle::config::AppConfig;
use mstyle::utils::logging;

/// Main entry point for the MStyle CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.overrides()).context("Failed to load configuration")?;
    logging::init(&config.logging);
    debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Classify(args) => commands::classify(args),
        Commands::Parse(args) => commands::parse(args),
        Commands::Generate(args) => commands::generate(args),
        Commands::FileKey(args) => commands::file_key(args, &config),
        Commands::CheckName(args) => commands::check_name(args, &config),
        Commands::Batch(args) => commands::batch(args, &config),
    }
}
