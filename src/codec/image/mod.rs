//! Image style codec
//!
//! An image style is an optional primary processing command (`imageView2`
//! or `imageMogr2`), an optional `watermark` and an optional `imageslim`,
//! always in that order.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::command::{join, split, SubCommand};
use super::envelope::{decode_envelope, encode_envelope};
use super::video::cover::FRAME_COMMAND;
use super::video::AVTHUMB_COMMAND;
use super::StyleCodec;
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{Style, StyleType};

pub mod mogr;
pub mod view;
pub mod watermark;

pub use mogr::{Blur, Crop, CropOffset, ImageMogr, OffsetDirection, Rotate, ScaleCropOrder, Thumbnail};
pub use view::{ImageView, ScaleMode};
pub use watermark::{ImageWatermark, WatermarkContent};

/// Output formats understood by the image processors
pub const IMAGE_FORMATS: &[&str] = &["jpg", "png", "gif", "webp", "bmp", "tiff", "heic", "avif"];

pub const DEFAULT_QUALITY: u32 = 75;

pub const SLIM_COMMAND: &str = "imageslim";

/// Primary scaling/cropping command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ImageProcess {
    Basic(ImageView),
    Advanced(ImageMogr),
}

impl ImageProcess {
    pub fn format(&self) -> Option<&str> {
        match self {
            ImageProcess::Basic(view) => view.format.as_deref(),
            ImageProcess::Advanced(mogr) => mogr.format.as_deref(),
        }
    }

    fn to_tokens(&self) -> SubCommand {
        match self {
            ImageProcess::Basic(view) => view.to_tokens(),
            ImageProcess::Advanced(mogr) => mogr.to_tokens(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageStyle {
    pub source_format: Option<String>,
    pub process: Option<ImageProcess>,
    pub watermark: Option<ImageWatermark>,
    #[serde(default)]
    pub slim: bool,
}

/// Canonical position of each sub-command within an image style
fn stage_of(name: &str) -> CommandResult<usize> {
    match name {
        view::COMMAND | mogr::COMMAND => Ok(0),
        watermark::COMMAND => Ok(1),
        SLIM_COMMAND => Ok(2),
        other => Err(CommandError::unsupported_command(other)),
    }
}

fn is_video_primary(name: &str) -> bool {
    name == FRAME_COMMAND || name == AVTHUMB_COMMAND
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }
}

impl StyleCodec for ImageCodec {
    type Form = ImageStyle;

    const KIND: StyleType = StyleType::Image;

    fn parse(&self, style: &Style) -> CommandResult<ImageStyle> {
        trace!(commands = %style.commands, "parsing image style");
        let (source_format, body) = decode_envelope(&style.commands);
        let sub_commands = split(&body);
        if sub_commands.is_empty() {
            return Err(CommandError::structural("image style has no commands"));
        }

        let mut form = ImageStyle {
            source_format,
            ..ImageStyle::default()
        };
        let mut last_stage: Option<usize> = None;

        for tokens in &sub_commands {
            let name = tokens[0].as_str();
            let stage = match stage_of(name) {
                Err(_) if sub_commands.len() > 1 && is_video_primary(name) => {
                    return Err(CommandError::structural(format!(
                        "'{}' cannot be combined with image commands",
                        name
                    )))
                }
                stage => stage?,
            };
            match last_stage {
                Some(last) if last == stage => {
                    return Err(CommandError::structural(format!(
                        "'{}' conflicts with an earlier command of the same kind",
                        name
                    )))
                }
                Some(last) if last > stage => {
                    return Err(CommandError::structural(format!(
                        "'{}' is out of order",
                        name
                    )))
                }
                _ => last_stage = Some(stage),
            }

            match name {
                view::COMMAND => form.process = Some(ImageProcess::Basic(ImageView::parse(tokens)?)),
                mogr::COMMAND => {
                    form.process = Some(ImageProcess::Advanced(ImageMogr::parse(tokens)?))
                }
                watermark::COMMAND => form.watermark = Some(ImageWatermark::parse(tokens)?),
                _ => {
                    if tokens.len() > 1 {
                        return Err(CommandError::unsupported_parameter(SLIM_COMMAND, &tokens[1]));
                    }
                    form.slim = true;
                }
            }
        }

        Ok(form)
    }

    fn generate_commands(&self, form: &ImageStyle) -> String {
        let mut sub_commands: Vec<SubCommand> = Vec::new();
        if let Some(process) = &form.process {
            sub_commands.push(process.to_tokens());
        }
        if let Some(watermark) = &form.watermark {
            sub_commands.push(watermark.to_tokens());
        }
        if form.slim {
            sub_commands.push(vec![SLIM_COMMAND.to_string()]);
        }
        encode_envelope(form.source_format.as_deref(), &join(&sub_commands))
    }

    fn output_format(&self, form: &ImageStyle) -> Option<String> {
        form.process
            .as_ref()
            .and_then(|p| p.format())
            .map(str::to_string)
            .or_else(|| form.source_format.clone())
    }
}
