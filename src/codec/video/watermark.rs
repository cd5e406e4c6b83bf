//! `avthumb` video watermark with an optional display timeline

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{single_command, AVTHUMB_COMMAND, VIDEO_FORMATS};
use crate::codec::command::join;
use crate::codec::envelope::encode_envelope;
use crate::codec::image::watermark::WATERMARK_FONTS;
use crate::codec::{decode_base64_field, encode_base64_field, parse_choice, Params, StyleCodec};
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{parse_hex_color, Gravity, Style, StyleType};
use crate::utils::number::{format_number, parse_integer, NumberSpec, SignRule};

const KEYS: &[&str] = &[
    "wmImage",
    "wmGravity",
    "wmText",
    "wmGravityText",
    "wmFont",
    "wmFontColor",
    "wmFontSize",
    "wmOffsetX",
    "wmOffsetY",
    "wmPos",
    "wmDuration",
];
const TEXT_ONLY_KEYS: &[&str] = &["wmGravityText", "wmFont", "wmFontColor", "wmFontSize"];

/// `wmPos` value anchoring the watermark to the end of the video
pub const END_SENTINEL: &str = "$(end)";
pub const MAX_TIMELINE_SECONDS: f64 = 180_000.0;

pub const DEFAULT_GRAVITY: Gravity = Gravity::NorthEast;
pub const DEFAULT_FONT: &str = "黑体";
pub const DEFAULT_FONT_COLOR: &str = "#000000";
pub const DEFAULT_FONT_SIZE: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VideoWatermarkContent {
    Image {
        url: String,
        gravity: Gravity,
    },
    Text {
        text: String,
        gravity: Gravity,
        font: String,
        color: String,
        font_size: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum TimelinePosition {
    /// Seconds from the start of the video
    At(f64),
    /// The end of the video; the duration counts backwards
    End,
}

/// When the watermark is shown.
///
/// From a numeric position the duration is non-negative; from
/// [`TimelinePosition::End`] it is negative and counts back from the end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub position: TimelinePosition,
    pub duration: f64,
}

impl Timeline {
    fn parse(pos: &str, duration: &str) -> CommandResult<Self> {
        let position = if pos == END_SENTINEL {
            TimelinePosition::End
        } else {
            TimelinePosition::At(NumberSpec::decimal(3, 0.0, MAX_TIMELINE_SECONDS).parse(pos)?)
        };
        let duration = NumberSpec::decimal(3, -MAX_TIMELINE_SECONDS, MAX_TIMELINE_SECONDS)
            .with_sign(SignRule::Minus)
            .parse(duration)?;

        match position {
            TimelinePosition::At(_) if duration < 0.0 => Err(CommandError::range(format!(
                "wmDuration {} must not be negative when wmPos is a time",
                format_number(duration)
            ))),
            TimelinePosition::End if duration >= 0.0 => Err(CommandError::range(format!(
                "wmDuration {} must be negative when wmPos is {}",
                format_number(duration),
                END_SENTINEL
            ))),
            _ => Ok(Self { position, duration }),
        }
    }

    fn position_token(&self) -> String {
        match self.position {
            TimelinePosition::At(seconds) => format_number(seconds),
            TimelinePosition::End => END_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoWatermarkStyle {
    pub source_format: Option<String>,
    pub format: String,
    pub content: VideoWatermarkContent,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    pub timeline: Option<Timeline>,
}

fn parse_offset(token: &str) -> CommandResult<i32> {
    NumberSpec::integer(-9999.0, 9999.0)
        .with_sign(SignRule::Minus)
        .parse(token)
        .map(|v| v as i32)
}

fn parse_content(params: &Params<'_>) -> CommandResult<VideoWatermarkContent> {
    match (params.get("wmImage"), params.get("wmText")) {
        (Some(_), Some(_)) => Err(CommandError::structural(
            "wmImage and wmText cannot be combined",
        )),
        (None, None) => Err(CommandError::structural("wmImage or wmText is required")),
        (Some(image), None) => {
            if let Some(key) = TEXT_ONLY_KEYS.iter().find(|key| params.has(key)) {
                return Err(CommandError::structural(format!(
                    "'{}' only applies to text watermarks",
                    key
                )));
            }
            let url = decode_base64_field(image, "image url")?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CommandError::syntax(url, "http(s) image url"));
            }
            let gravity = params
                .get("wmGravity")
                .map(Gravity::parse)
                .transpose()?
                .unwrap_or(DEFAULT_GRAVITY);
            Ok(VideoWatermarkContent::Image { url, gravity })
        }
        (None, Some(text)) => {
            if params.has("wmGravity") {
                return Err(CommandError::structural(
                    "'wmGravity' only applies to image watermarks",
                ));
            }
            let text = decode_base64_field(text, "text")?;
            if text.is_empty() {
                return Err(CommandError::structural("wmText is empty"));
            }
            let gravity = params
                .get("wmGravityText")
                .map(Gravity::parse)
                .transpose()?
                .unwrap_or(DEFAULT_GRAVITY);
            let font = match params.get("wmFont") {
                Some(token) => {
                    let font = decode_base64_field(token, "font")?;
                    parse_choice(&font, WATERMARK_FONTS, "watermark font").map_err(|_| {
                        CommandError::unsupported_parameter(AVTHUMB_COMMAND, "wmFont")
                    })?
                }
                None => DEFAULT_FONT.to_string(),
            };
            let color = match params.get("wmFontColor") {
                Some(token) => parse_hex_color(&decode_base64_field(token, "font color")?)?,
                None => DEFAULT_FONT_COLOR.to_string(),
            };
            let font_size = match params.get("wmFontSize") {
                Some(token) => parse_integer(token, 1, 1000)? as u32,
                None => DEFAULT_FONT_SIZE,
            };
            Ok(VideoWatermarkContent::Text {
                text,
                gravity,
                font,
                color,
                font_size,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoWatermarkCodec;

impl VideoWatermarkCodec {
    pub fn new() -> Self {
        Self
    }
}

impl StyleCodec for VideoWatermarkCodec {
    type Form = VideoWatermarkStyle;

    const KIND: StyleType = StyleType::VideoWatermark;

    fn parse(&self, style: &Style) -> CommandResult<VideoWatermarkStyle> {
        trace!(commands = %style.commands, "parsing video watermark style");
        let (source_format, tokens) = single_command(&style.commands, "video watermark")?;
        if tokens[0] != AVTHUMB_COMMAND {
            return Err(CommandError::unsupported_command(tokens[0].as_str()));
        }
        let format = tokens.get(1).ok_or_else(|| {
            CommandError::structural(format!("{} requires an output format", AVTHUMB_COMMAND))
        })?;
        let format = parse_choice(format, VIDEO_FORMATS, "video format")?;

        let params = Params::read(AVTHUMB_COMMAND, &tokens[2..], KEYS, &[])?;
        params.require_companion("wmPos", "wmDuration")?;
        params.require_companion("wmDuration", "wmPos")?;

        let content = parse_content(&params)?;
        let offset_x = params.get("wmOffsetX").map(parse_offset).transpose()?.unwrap_or(0);
        let offset_y = params.get("wmOffsetY").map(parse_offset).transpose()?.unwrap_or(0);
        let timeline = match (params.get("wmPos"), params.get("wmDuration")) {
            (Some(pos), Some(duration)) => Some(Timeline::parse(pos, duration)?),
            _ => None,
        };

        Ok(VideoWatermarkStyle {
            source_format,
            format,
            content,
            offset_x,
            offset_y,
            timeline,
        })
    }

    fn generate_commands(&self, form: &VideoWatermarkStyle) -> String {
        let mut tokens = vec![AVTHUMB_COMMAND.to_string(), form.format.clone()];
        match &form.content {
            VideoWatermarkContent::Image { url, gravity } => tokens.extend([
                "wmImage".to_string(),
                encode_base64_field(url),
                "wmGravity".to_string(),
                gravity.to_string(),
            ]),
            VideoWatermarkContent::Text {
                text,
                gravity,
                font,
                color,
                font_size,
            } => tokens.extend([
                "wmText".to_string(),
                encode_base64_field(text),
                "wmGravityText".to_string(),
                gravity.to_string(),
                "wmFont".to_string(),
                encode_base64_field(font),
                "wmFontColor".to_string(),
                encode_base64_field(color),
                "wmFontSize".to_string(),
                font_size.to_string(),
            ]),
        }
        tokens.extend([
            "wmOffsetX".to_string(),
            form.offset_x.to_string(),
            "wmOffsetY".to_string(),
            form.offset_y.to_string(),
        ]);
        if let Some(timeline) = &form.timeline {
            tokens.extend([
                "wmPos".to_string(),
                timeline.position_token(),
                "wmDuration".to_string(),
                format_number(timeline.duration),
            ]);
        }
        encode_envelope(form.source_format.as_deref(), &join(&[tokens]))
    }

    fn output_format(&self, form: &VideoWatermarkStyle) -> Option<String> {
        Some(form.format.clone())
    }
}
