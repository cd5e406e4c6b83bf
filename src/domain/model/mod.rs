// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::envelope;
use crate::domain::errors::{CommandError, CommandResult};

/// A named, persisted image/video transformation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub commands: String,
    #[serde(default)]
    pub persistence_enabled: bool,
}

impl Style {
    /// Create a new style with persistence disabled
    pub fn new(name: impl Into<String>, commands: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: commands.into(),
            persistence_enabled: false,
        }
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persistence_enabled = enabled;
        self
    }

    /// Source format scoped by the `$0.<format>?` envelope, if any
    pub fn source_format(&self) -> Option<String> {
        envelope::decode_envelope(&self.commands).0
    }

    /// Command string with the envelope removed
    pub fn body(&self) -> String {
        envelope::decode_envelope(&self.commands).1
    }
}

/// Graphical edit mode a style belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleType {
    Image,
    VideoCover,
    VideoWatermark,
    VideoTranscode,
    /// No structured codec accepts the commands; edit as raw text
    Manual,
}

impl StyleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleType::Image => "image",
            StyleType::VideoCover => "video_cover",
            StyleType::VideoWatermark => "video_watermark",
            StyleType::VideoTranscode => "video_transcode",
            StyleType::Manual => "manual",
        }
    }

    /// Parse a style type from its name (case insensitive, `-` or `_`)
    pub fn parse(value: &str) -> CommandResult<Self> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "image" => Ok(StyleType::Image),
            "video_cover" => Ok(StyleType::VideoCover),
            "video_watermark" => Ok(StyleType::VideoWatermark),
            "video_transcode" => Ok(StyleType::VideoTranscode),
            "manual" => Ok(StyleType::Manual),
            _ => Err(CommandError::syntax(value, "style type")),
        }
    }
}

impl fmt::Display for StyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nine-way anchor used by crop and watermark placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    #[default]
    SouthEast,
}

impl Gravity {
    pub const ALL: [Gravity; 9] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::NorthWest => "NorthWest",
            Gravity::North => "North",
            Gravity::NorthEast => "NorthEast",
            Gravity::West => "West",
            Gravity::Center => "Center",
            Gravity::East => "East",
            Gravity::SouthWest => "SouthWest",
            Gravity::South => "South",
            Gravity::SouthEast => "SouthEast",
        }
    }

    /// Parse a gravity token; the grammar is case sensitive
    pub fn parse(token: &str) -> CommandResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == token)
            .ok_or_else(|| CommandError::syntax(token, "gravity"))
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a `#RRGGBB` color value
pub fn parse_hex_color(value: &str) -> CommandResult<String> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(value.to_string())
    } else {
        Err(CommandError::syntax(value, "#RRGGBB color"))
    }
}

#[cfg(test)]
mod tests;
