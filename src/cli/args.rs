//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Style command string
    pub commands: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Style command string
    pub commands: String,

    /// Parse with one edit mode instead of classifying
    /// (image, video_cover, video_watermark, video_transcode, manual)
    #[arg(long = "as", value_name = "TYPE")]
    pub style_type: Option<String>,
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Form file (.json, .yaml or .yml) as printed by `parse`
    pub form: PathBuf,

    /// Print a full style with this name instead of the bare commands
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for the file-key command
#[derive(Args, Debug)]
pub struct FileKeyArgs {
    /// Key of the original file
    pub raw_name: String,

    /// Style name
    #[arg(short, long)]
    pub style: String,

    /// Style command string
    #[arg(short, long)]
    pub commands: String,
}

/// Arguments for the check-name command
#[derive(Args, Debug)]
pub struct CheckNameArgs {
    /// Style name
    pub name: String,

    /// Style command string used to resolve the output format
    #[arg(short, long)]
    pub commands: Option<String>,
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Style list file (.json, .yaml or .yml)
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
