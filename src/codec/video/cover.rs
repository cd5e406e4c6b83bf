//! Video cover: a static `vframe` frame or an animated `avthumb/gif` clip

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{parse_seconds, single_command, AutoScale, Resolution, AVTHUMB_COMMAND, MAX_VIDEO_SIDE};
use crate::codec::command::join;
use crate::codec::envelope::encode_envelope;
use crate::codec::{parse_choice, Params, StyleCodec};
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{Style, StyleType};
use crate::utils::number::{ensure_width_height_valid, format_number, parse_u32, NumberSpec};

pub const FRAME_COMMAND: &str = "vframe";
pub const FRAME_FORMATS: &[&str] = &["jpg", "png"];
pub const ANIMATED_FORMAT: &str = "gif";

const FRAME_KEYS: &[&str] = &["offset", "w", "h", "rotate"];
const ANIMATED_KEYS: &[&str] = &["ss", "s", "t", "autoscale"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRotate {
    Auto,
    Deg90,
    Deg180,
    Deg270,
}

impl FrameRotate {
    pub fn parse(token: &str) -> CommandResult<Self> {
        match token {
            "auto" => Ok(FrameRotate::Auto),
            "90" => Ok(FrameRotate::Deg90),
            "180" => Ok(FrameRotate::Deg180),
            "270" => Ok(FrameRotate::Deg270),
            other => Err(CommandError::syntax(other, "rotation (90, 180, 270 or auto)")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameRotate::Auto => "auto",
            FrameRotate::Deg90 => "90",
            FrameRotate::Deg180 => "180",
            FrameRotate::Deg270 => "270",
        }
    }
}

/// One still frame taken at `offset` seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCover {
    pub format: String,
    pub offset: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate: Option<FrameRotate>,
}

/// A GIF clip of `duration` seconds starting at `offset`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedCover {
    pub offset: f64,
    pub duration: f64,
    pub resolution: Option<Resolution>,
    pub auto_scale: Option<AutoScale>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoCover {
    Static(StaticCover),
    Animated(AnimatedCover),
}

impl VideoCover {
    pub fn format(&self) -> &str {
        match self {
            VideoCover::Static(cover) => &cover.format,
            VideoCover::Animated(_) => ANIMATED_FORMAT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCoverStyle {
    pub source_format: Option<String>,
    pub cover: VideoCover,
}

fn parse_static(tokens: &[String]) -> CommandResult<StaticCover> {
    let format = tokens.get(1).ok_or_else(|| {
        CommandError::structural(format!("{} requires an output format", FRAME_COMMAND))
    })?;
    let format = parse_choice(format, FRAME_FORMATS, "frame format")?;
    let params = Params::read(FRAME_COMMAND, &tokens[2..], FRAME_KEYS, &[])?;

    let offset = parse_seconds(params.require("offset")?)?;
    let width = params
        .get("w")
        .map(|w| parse_u32(w, 1, MAX_VIDEO_SIDE))
        .transpose()?;
    let height = params
        .get("h")
        .map(|h| parse_u32(h, 1, MAX_VIDEO_SIDE))
        .transpose()?;
    ensure_width_height_valid(width, height)?;
    let rotate = params.get("rotate").map(FrameRotate::parse).transpose()?;

    Ok(StaticCover {
        format,
        offset,
        width,
        height,
        rotate,
    })
}

fn parse_animated(tokens: &[String]) -> CommandResult<AnimatedCover> {
    match tokens.get(1).map(String::as_str) {
        Some(ANIMATED_FORMAT) => {}
        Some(other) => {
            return Err(CommandError::unsupported_command(format!(
                "{}/{}",
                AVTHUMB_COMMAND, other
            )))
        }
        None => {
            return Err(CommandError::structural(format!(
                "{} requires an output format",
                AVTHUMB_COMMAND
            )))
        }
    }
    let params = Params::read(AVTHUMB_COMMAND, &tokens[2..], ANIMATED_KEYS, &[])?;
    params.require_companion("autoscale", "s")?;

    let offset = parse_seconds(params.require("ss")?)?;
    let duration = NumberSpec::decimal(3, 0.001, 3600.0).parse(params.require("t")?)?;
    let resolution = params.get("s").map(Resolution::parse).transpose()?;
    let auto_scale = params.get("autoscale").map(AutoScale::parse).transpose()?;

    Ok(AnimatedCover {
        offset,
        duration,
        resolution,
        auto_scale,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoCoverCodec;

impl VideoCoverCodec {
    pub fn new() -> Self {
        Self
    }
}

impl StyleCodec for VideoCoverCodec {
    type Form = VideoCoverStyle;

    const KIND: StyleType = StyleType::VideoCover;

    fn parse(&self, style: &Style) -> CommandResult<VideoCoverStyle> {
        trace!(commands = %style.commands, "parsing video cover style");
        let (source_format, tokens) = single_command(&style.commands, "video cover")?;
        let cover = match tokens[0].as_str() {
            FRAME_COMMAND => VideoCover::Static(parse_static(&tokens)?),
            AVTHUMB_COMMAND => VideoCover::Animated(parse_animated(&tokens)?),
            other => return Err(CommandError::unsupported_command(other)),
        };
        Ok(VideoCoverStyle {
            source_format,
            cover,
        })
    }

    fn generate_commands(&self, form: &VideoCoverStyle) -> String {
        let tokens = match &form.cover {
            VideoCover::Static(cover) => {
                let mut tokens = vec![
                    FRAME_COMMAND.to_string(),
                    cover.format.clone(),
                    "offset".to_string(),
                    format_number(cover.offset),
                ];
                if let Some(w) = cover.width {
                    tokens.extend(["w".to_string(), w.to_string()]);
                }
                if let Some(h) = cover.height {
                    tokens.extend(["h".to_string(), h.to_string()]);
                }
                if let Some(rotate) = cover.rotate {
                    tokens.extend(["rotate".to_string(), rotate.as_str().to_string()]);
                }
                tokens
            }
            VideoCover::Animated(cover) => {
                let mut tokens = vec![
                    AVTHUMB_COMMAND.to_string(),
                    ANIMATED_FORMAT.to_string(),
                    "ss".to_string(),
                    format_number(cover.offset),
                ];
                if let Some(resolution) = cover.resolution {
                    tokens.extend(["s".to_string(), resolution.to_token()]);
                }
                tokens.extend(["t".to_string(), format_number(cover.duration)]);
                if let (Some(auto_scale), Some(_)) = (cover.auto_scale, cover.resolution) {
                    tokens.extend(["autoscale".to_string(), auto_scale.code().to_string()]);
                }
                tokens
            }
        };
        encode_envelope(form.source_format.as_deref(), &join(&[tokens]))
    }

    fn output_format(&self, form: &VideoCoverStyle) -> Option<String> {
        Some(form.cover.format().to_string())
    }
}
