//! CLI module for MStyle
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// MStyle media style tool
///
/// Parses, classifies and regenerates slash-delimited image and video
/// style commands such as `imageView2/1/w/240/h/180`.
#[derive(Parser, Debug)]
#[command(name = "mstyle")]
#[command(about = "MStyle - Codec and classifier for media style commands")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./mstyle.toml when present)
    #[arg(long, global = true, env = "MSTYLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Logging output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Separator between a file key and a style name
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line layer of the configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            log_level: self.log_level,
            log_format: self.log_format,
            separator: self.separator.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the edit mode a command string belongs to
    Classify(args::ClassifyArgs),
    /// Parse a command string into its structured form
    Parse(args::ParseArgs),
    /// Regenerate canonical commands from a structured form file
    Generate(args::GenerateArgs),
    /// Compute the file key of a styled resource
    FileKey(args::FileKeyArgs),
    /// Validate a style name against the output format of its commands
    CheckName(args::CheckNameArgs),
    /// Classify every style of a JSON or YAML style list
    Batch(args::BatchArgs),
}
