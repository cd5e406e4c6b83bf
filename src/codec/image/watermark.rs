//! `watermark` picture and text overlays

use serde::{Deserialize, Serialize};

use crate::codec::{decode_base64_field, encode_base64_field, parse_choice, Params};
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{parse_hex_color, Gravity};
use crate::utils::number::parse_u32;

pub const COMMAND: &str = "watermark";

const PICTURE_KEYS: &[&str] = &["image", "dissolve", "gravity", "dx", "dy", "ws", "wst"];
const TEXT_KEYS: &[&str] = &["text", "font", "fontsize", "fill", "dissolve", "gravity", "dx", "dy"];

/// Fonts the text watermark renderer knows about
pub const WATERMARK_FONTS: &[&str] = &[
    "宋体",
    "黑体",
    "楷体",
    "仿宋",
    "微软雅黑",
    "文泉驿正黑",
    "文泉驿微米黑",
    "Arial",
    "Helvetica",
    "Times New Roman",
];

pub const DEFAULT_FONT: &str = "黑体";
pub const DEFAULT_FONT_SIZE: u32 = 240;
pub const DEFAULT_FILL: &str = "#000000";
pub const DEFAULT_DISSOLVE: u32 = 100;
pub const DEFAULT_OFFSET: u32 = 10;

/// What the watermark draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WatermarkContent {
    /// Mode `1`
    Picture { image: String },
    /// Mode `2`; `font_size` is in twentieths of a point
    Text {
        text: String,
        font: String,
        font_size: u32,
        fill: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageWatermark {
    pub content: WatermarkContent,
    pub gravity: Gravity,
    pub dissolve: u32,
    pub dx: u32,
    pub dy: u32,
}

impl ImageWatermark {
    pub fn picture(image: impl Into<String>) -> Self {
        Self::with_content(WatermarkContent::Picture {
            image: image.into(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(WatermarkContent::Text {
            text: text.into(),
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            fill: DEFAULT_FILL.to_string(),
        })
    }

    fn with_content(content: WatermarkContent) -> Self {
        Self {
            content,
            gravity: Gravity::SouthEast,
            dissolve: DEFAULT_DISSOLVE,
            dx: DEFAULT_OFFSET,
            dy: DEFAULT_OFFSET,
        }
    }

    /// Parse the tokens of a `watermark` sub-command, name included
    pub fn parse(tokens: &[String]) -> CommandResult<Self> {
        let mode = tokens.get(1).ok_or_else(|| {
            CommandError::structural(format!("{} requires a mode", COMMAND))
        })?;

        let (params, content) = match mode.as_str() {
            "1" => {
                let params = Params::read(COMMAND, &tokens[2..], PICTURE_KEYS, &[])?;
                params.ensure_default("ws", "0")?;
                params.ensure_default("wst", "0")?;
                let image = decode_base64_field(params.require("image")?, "image url")?;
                if !(image.starts_with("http://") || image.starts_with("https://")) {
                    return Err(CommandError::syntax(image, "http(s) image url"));
                }
                (params, WatermarkContent::Picture { image })
            }
            "2" => {
                let params = Params::read(COMMAND, &tokens[2..], TEXT_KEYS, &[])?;
                let text = decode_base64_field(params.require("text")?, "text")?;
                if text.is_empty() {
                    return Err(CommandError::structural("watermark text is empty"));
                }
                let font = match params.get("font") {
                    Some(token) => {
                        let font = decode_base64_field(token, "font")?;
                        parse_choice(&font, WATERMARK_FONTS, "watermark font")
                            .map_err(|_| CommandError::unsupported_parameter(COMMAND, "font"))?
                    }
                    None => DEFAULT_FONT.to_string(),
                };
                let font_size = match params.get("fontsize") {
                    Some(token) => parse_font_size(token)?,
                    None => DEFAULT_FONT_SIZE,
                };
                let fill = match params.get("fill") {
                    Some(token) => parse_hex_color(&decode_base64_field(token, "fill")?)?,
                    None => DEFAULT_FILL.to_string(),
                };
                (
                    params,
                    WatermarkContent::Text {
                        text,
                        font,
                        font_size,
                        fill,
                    },
                )
            }
            "3" => return Err(CommandError::unsupported_parameter(COMMAND, "mode")),
            other => return Err(CommandError::syntax(other, "watermark mode (1 or 2)")),
        };

        let mut watermark = Self::with_content(content);
        if let Some(gravity) = params.get("gravity") {
            watermark.gravity = Gravity::parse(gravity)?;
        }
        if let Some(dissolve) = params.get("dissolve") {
            watermark.dissolve = parse_u32(dissolve, 1, 100)?;
        }
        if let Some(dx) = params.get("dx") {
            watermark.dx = parse_u32(dx, 1, 9999)?;
        }
        if let Some(dy) = params.get("dy") {
            watermark.dy = parse_u32(dy, 1, 9999)?;
        }

        Ok(watermark)
    }

    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = vec![COMMAND.to_string()];
        match &self.content {
            WatermarkContent::Picture { image } => {
                tokens.extend([
                    "1".to_string(),
                    "image".to_string(),
                    encode_base64_field(image),
                ]);
            }
            WatermarkContent::Text {
                text,
                font,
                font_size,
                fill,
            } => {
                tokens.extend([
                    "2".to_string(),
                    "text".to_string(),
                    encode_base64_field(text),
                    "font".to_string(),
                    encode_base64_field(font),
                    "fontsize".to_string(),
                    font_size.to_string(),
                    "fill".to_string(),
                    encode_base64_field(fill),
                ]);
            }
        }
        tokens.extend([
            "dissolve".to_string(),
            self.dissolve.to_string(),
            "gravity".to_string(),
            self.gravity.to_string(),
            "dx".to_string(),
            self.dx.to_string(),
            "dy".to_string(),
            self.dy.to_string(),
        ]);
        tokens
    }
}

/// Font size in twentieths of a point; must land on a whole point
fn parse_font_size(token: &str) -> CommandResult<u32> {
    let size = parse_u32(token, 20, 10000)?;
    if size % 20 != 0 {
        return Err(CommandError::range(format!(
            "fontsize {} is not a multiple of 20",
            size
        )));
    }
    Ok(size)
}
