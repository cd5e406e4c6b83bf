//! Video style codecs and their shared field types

use serde::{Deserialize, Serialize};

use super::command::{split, SubCommand};
use super::envelope::decode_envelope;
use crate::domain::errors::{CommandError, CommandResult};
use crate::utils::number::{ensure_width_height_valid, parse_u32, NumberSpec};

pub mod cover;
pub mod transcode;
pub mod watermark;

pub use cover::{AnimatedCover, FrameRotate, StaticCover, VideoCover, VideoCoverCodec, VideoCoverStyle};
pub use transcode::{Bitrate, BitrateUnit, VideoTranscodeCodec, VideoTranscodeStyle};
pub use watermark::{
    Timeline, TimelinePosition, VideoWatermarkCodec, VideoWatermarkContent, VideoWatermarkStyle,
};

pub const AVTHUMB_COMMAND: &str = "avthumb";

/// Container formats a transcode or video watermark may produce
pub const VIDEO_FORMATS: &[&str] = &["mp4", "flv", "mov", "mkv", "webm"];

/// Largest side accepted for video output
pub const MAX_VIDEO_SIDE: u32 = 3840;

/// `<W>x<H>` output resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn parse(token: &str) -> CommandResult<Self> {
        let (w, h) = token
            .split_once('x')
            .ok_or_else(|| CommandError::syntax(token, "<width>x<height> resolution"))?;
        let width = parse_u32(w, 1, MAX_VIDEO_SIDE)?;
        let height = parse_u32(h, 1, MAX_VIDEO_SIDE)?;
        ensure_width_height_valid(Some(width), Some(height))?;
        Ok(Self { width, height })
    }

    pub fn to_token(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// How the source is fitted into `s` when aspect ratios differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoScale {
    /// 0: stretch to the exact resolution
    Off,
    /// 1: keep aspect ratio, pad to the resolution
    Fit,
    /// 2: keep aspect ratio, crop to the resolution
    Fill,
}

impl AutoScale {
    pub fn parse(token: &str) -> CommandResult<Self> {
        match parse_u32(token, 0, 2)? {
            0 => Ok(AutoScale::Off),
            1 => Ok(AutoScale::Fit),
            _ => Ok(AutoScale::Fill),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            AutoScale::Off => 0,
            AutoScale::Fit => 1,
            AutoScale::Fill => 2,
        }
    }
}

/// Seconds with millisecond precision, `>= 0`
pub(crate) fn parse_seconds(token: &str) -> CommandResult<f64> {
    NumberSpec::decimal(3, 0.0, 0.0).without_max().parse(token)
}

/// Decode the envelope and require exactly one sub-command
pub(crate) fn single_command(commands: &str, kind: &str) -> CommandResult<(Option<String>, SubCommand)> {
    let (source_format, body) = decode_envelope(commands);
    let mut sub_commands = split(&body);
    match sub_commands.len() {
        0 => Err(CommandError::structural(format!("{} style has no commands", kind))),
        1 => Ok((source_format, sub_commands.remove(0))),
        _ => Err(CommandError::structural(format!(
            "{} style takes a single command",
            kind
        ))),
    }
}

#[cfg(test)]
mod tests;
