//! `imageMogr2` advanced processing

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{DEFAULT_QUALITY, IMAGE_FORMATS};
use crate::codec::{
    decode_base64_field, encode_base64_field, parse_choice, parse_switch, Params,
};
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{parse_hex_color, Gravity};
use crate::utils::number::parse_u32;

pub const COMMAND: &str = "imageMogr2";

const KEYS: &[&str] = &[
    "thumbnail",
    "gravity",
    "crop",
    "blur",
    "rotate",
    "background",
    "format",
    "interlace",
    "quality",
];
const AUTO_ORIENT: &str = "auto-orient";

const MAX_SIDE: u32 = 9999;
const MAX_PERCENT: u32 = 999;
const MAX_AREA: u32 = 24_999_999;

/// `thumbnail` scaling syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Thumbnail {
    /// `!<P>p`
    ScalePercent { percent: u32 },
    /// `!<P>px`
    WidthPercent { percent: u32 },
    /// `!x<P>p`
    HeightPercent { percent: u32 },
    /// `<W>x`
    FixedWidth { width: u32 },
    /// `x<H>`
    FixedHeight { height: u32 },
    /// `<W>x<H>`
    Contain { width: u32, height: u32 },
    /// `!<W>x<H>r`
    Cover { width: u32, height: u32 },
    /// `<W>x<H>!`
    Force { width: u32, height: u32 },
    /// `<W>x<H>>`
    ShrinkOnly { width: u32, height: u32 },
    /// `<W>x<H><`
    EnlargeOnly { width: u32, height: u32 },
    /// `<A>@`
    PixelBudget { area: u32 },
}

fn side(token: &str) -> CommandResult<u32> {
    parse_u32(token, 1, MAX_SIDE)
}

fn percent(token: &str) -> CommandResult<u32> {
    parse_u32(token, 1, MAX_PERCENT)
}

/// Split `<W>x<H>` where both sides are required
fn pair(token: &str, original: &str) -> CommandResult<(u32, u32)> {
    match token.split_once('x') {
        Some((w, h)) if !w.is_empty() && !h.is_empty() => Ok((side(w)?, side(h)?)),
        _ => Err(CommandError::syntax(original, "thumbnail size")),
    }
}

impl Thumbnail {
    pub fn parse(token: &str) -> CommandResult<Self> {
        if let Some(rest) = token.strip_prefix('!') {
            if let Some(p) = rest.strip_prefix('x').and_then(|r| r.strip_suffix('p')) {
                return Ok(Thumbnail::HeightPercent { percent: percent(p)? });
            }
            if let Some(p) = rest.strip_suffix("px") {
                return Ok(Thumbnail::WidthPercent { percent: percent(p)? });
            }
            if let Some(p) = rest.strip_suffix('p') {
                return Ok(Thumbnail::ScalePercent { percent: percent(p)? });
            }
            if let Some(size) = rest.strip_suffix('r') {
                let (width, height) = pair(size, token)?;
                return Ok(Thumbnail::Cover { width, height });
            }
            return Err(CommandError::syntax(token, "thumbnail"));
        }
        if let Some(area) = token.strip_suffix('@') {
            return Ok(Thumbnail::PixelBudget {
                area: parse_u32(area, 1, MAX_AREA)?,
            });
        }
        if let Some(size) = token.strip_suffix('!') {
            let (width, height) = pair(size, token)?;
            return Ok(Thumbnail::Force { width, height });
        }
        if let Some(size) = token.strip_suffix('>') {
            let (width, height) = pair(size, token)?;
            return Ok(Thumbnail::ShrinkOnly { width, height });
        }
        if let Some(size) = token.strip_suffix('<') {
            let (width, height) = pair(size, token)?;
            return Ok(Thumbnail::EnlargeOnly { width, height });
        }
        match token.split_once('x') {
            Some(("", "")) | None => Err(CommandError::syntax(token, "thumbnail")),
            Some((w, "")) => Ok(Thumbnail::FixedWidth { width: side(w)? }),
            Some(("", h)) => Ok(Thumbnail::FixedHeight { height: side(h)? }),
            Some((w, h)) => Ok(Thumbnail::Contain {
                width: side(w)?,
                height: side(h)?,
            }),
        }
    }

    pub fn to_token(&self) -> String {
        match self {
            Thumbnail::ScalePercent { percent } => format!("!{}p", percent),
            Thumbnail::WidthPercent { percent } => format!("!{}px", percent),
            Thumbnail::HeightPercent { percent } => format!("!x{}p", percent),
            Thumbnail::FixedWidth { width } => format!("{}x", width),
            Thumbnail::FixedHeight { height } => format!("x{}", height),
            Thumbnail::Contain { width, height } => format!("{}x{}", width, height),
            Thumbnail::Cover { width, height } => format!("!{}x{}r", width, height),
            Thumbnail::Force { width, height } => format!("{}x{}!", width, height),
            Thumbnail::ShrinkOnly { width, height } => format!("{}x{}>", width, height),
            Thumbnail::EnlargeOnly { width, height } => format!("{}x{}<", width, height),
            Thumbnail::PixelBudget { area } => format!("{}@", area),
        }
    }
}

/// Direction of a crop offset relative to the gravity origin, from its `a`/`-` sign pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetDirection {
    /// `a<dx>a<dy>`
    RightDown,
    /// `-<dx>a<dy>`
    LeftDown,
    /// `a<dx>-<dy>`
    RightUp,
    /// `-<dx>-<dy>`
    LeftUp,
}

impl OffsetDirection {
    fn from_signs(x: &str, y: &str) -> Self {
        match (x, y) {
            ("-", "-") => OffsetDirection::LeftUp,
            ("-", _) => OffsetDirection::LeftDown,
            (_, "-") => OffsetDirection::RightUp,
            _ => OffsetDirection::RightDown,
        }
    }

    fn signs(&self) -> (char, char) {
        match self {
            OffsetDirection::RightDown => ('a', 'a'),
            OffsetDirection::LeftDown => ('-', 'a'),
            OffsetDirection::RightUp => ('a', '-'),
            OffsetDirection::LeftUp => ('-', '-'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropOffset {
    pub direction: OffsetDirection,
    pub dx: u32,
    pub dy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub gravity: Option<Gravity>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub offset: Option<CropOffset>,
}

fn crop_offset_regex() -> &'static Regex {
    static CROP_OFFSET_RE: OnceLock<Regex> = OnceLock::new();
    CROP_OFFSET_RE.get_or_init(|| {
        Regex::new(r"^!(\d+)x(\d+)([a-])(\d+)([a-])(\d+)$")
            .expect("crop offset regex should compile")
    })
}

fn crop_size_regex() -> &'static Regex {
    static CROP_SIZE_RE: OnceLock<Regex> = OnceLock::new();
    CROP_SIZE_RE
        .get_or_init(|| Regex::new(r"^(\d*)x(\d*)$").expect("crop size regex should compile"))
}

impl Crop {
    pub fn parse(token: &str, gravity: Option<Gravity>) -> CommandResult<Self> {
        if let Some(caps) = crop_offset_regex().captures(token) {
            let direction = OffsetDirection::from_signs(&caps[3], &caps[5]);
            return Ok(Crop {
                gravity,
                width: Some(side(&caps[1])?),
                height: Some(side(&caps[2])?),
                offset: Some(CropOffset {
                    direction,
                    dx: parse_u32(&caps[4], 0, MAX_SIDE)?,
                    dy: parse_u32(&caps[6], 0, MAX_SIDE)?,
                }),
            });
        }

        let caps = crop_size_regex()
            .captures(token)
            .ok_or_else(|| CommandError::syntax(token, "crop size"))?;
        let width = match &caps[1] {
            "" => None,
            w => Some(side(w)?),
        };
        let height = match &caps[2] {
            "" => None,
            h => Some(side(h)?),
        };
        if width.is_none() && height.is_none() {
            return Err(CommandError::syntax(token, "crop size"));
        }

        Ok(Crop {
            gravity,
            width,
            height,
            offset: None,
        })
    }

    pub fn to_token(&self) -> String {
        let size = format!(
            "{}x{}",
            self.width.map(|w| w.to_string()).unwrap_or_default(),
            self.height.map(|h| h.to_string()).unwrap_or_default()
        );
        match &self.offset {
            Some(offset) => {
                let (sx, sy) = offset.direction.signs();
                format!("!{}{}{}{}{}", size, sx, offset.dx, sy, offset.dy)
            }
            None => size,
        }
    }
}

/// Whether `crop` was applied before or after `thumbnail`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleCropOrder {
    #[default]
    ScaleFirst,
    CropFirst,
}

/// Gaussian blur; a sigma of 0 disables it and is never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blur {
    pub radius: u32,
    pub sigma: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotate {
    pub angle: u32,
    /// `#RRGGBB` fill for the uncovered corners
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMogr {
    #[serde(default)]
    pub auto_orient: bool,
    pub thumbnail: Option<Thumbnail>,
    pub crop: Option<Crop>,
    #[serde(default)]
    pub scale_crop_order: ScaleCropOrder,
    pub blur: Option<Blur>,
    pub rotate: Option<Rotate>,
    pub format: Option<String>,
    #[serde(default)]
    pub interlace: bool,
    #[serde(default = "default_quality")]
    pub quality: u32,
}

fn default_quality() -> u32 {
    DEFAULT_QUALITY
}

impl Default for ImageMogr {
    fn default() -> Self {
        Self {
            auto_orient: false,
            thumbnail: None,
            crop: None,
            scale_crop_order: ScaleCropOrder::ScaleFirst,
            blur: None,
            rotate: None,
            format: None,
            interlace: false,
            quality: DEFAULT_QUALITY,
        }
    }
}

fn parse_blur(token: &str) -> CommandResult<Option<Blur>> {
    let (radius, sigma) = token
        .split_once('x')
        .ok_or_else(|| CommandError::syntax(token, "blur <radius>x<sigma>"))?;
    let radius = parse_u32(radius, 1, 50)?;
    let sigma = parse_u32(sigma, 0, 50)?;
    Ok((sigma > 0).then_some(Blur { radius, sigma }))
}

impl ImageMogr {
    /// Parse the tokens of an `imageMogr2` sub-command, name included
    pub fn parse(tokens: &[String]) -> CommandResult<Self> {
        let params = Params::read(COMMAND, &tokens[1..], KEYS, &[AUTO_ORIENT])?;
        params.require_companion("gravity", "crop")?;
        params.require_companion("background", "rotate")?;

        let mut mogr = Self {
            auto_orient: params.has(AUTO_ORIENT),
            ..Self::default()
        };

        if let Some(thumbnail) = params.get("thumbnail") {
            mogr.thumbnail = Some(Thumbnail::parse(thumbnail)?);
        }
        if let Some(crop) = params.get("crop") {
            let gravity = params.get("gravity").map(Gravity::parse).transpose()?;
            mogr.crop = Some(Crop::parse(crop, gravity)?);
        }
        if let (Some(crop_at), Some(thumbnail_at)) =
            (params.position("crop"), params.position("thumbnail"))
        {
            if crop_at < thumbnail_at {
                mogr.scale_crop_order = ScaleCropOrder::CropFirst;
            }
        }
        if let Some(blur) = params.get("blur") {
            mogr.blur = parse_blur(blur)?;
        }
        if let Some(rotate) = params.get("rotate") {
            let background = params
                .get("background")
                .map(|token| {
                    decode_base64_field(token, "background").and_then(|c| parse_hex_color(&c))
                })
                .transpose()?;
            mogr.rotate = Some(Rotate {
                angle: parse_u32(rotate, 1, 360)?,
                background,
            });
        }
        if let Some(format) = params.get("format") {
            mogr.format = Some(parse_choice(format, IMAGE_FORMATS, "image format")?);
        }
        if let Some(interlace) = params.get("interlace") {
            mogr.interlace = parse_switch(interlace, "interlace")?;
        }
        if let Some(quality) = params.get("quality") {
            mogr.quality = parse_u32(quality, 1, 100)?;
        }

        Ok(mogr)
    }

    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = vec![COMMAND.to_string()];
        if self.auto_orient {
            tokens.push(AUTO_ORIENT.to_string());
        }

        let thumbnail = self
            .thumbnail
            .map(|t| vec!["thumbnail".to_string(), t.to_token()])
            .unwrap_or_default();
        let crop = self
            .crop
            .map(|c| {
                let mut crop_tokens = Vec::new();
                if let Some(gravity) = c.gravity {
                    crop_tokens.extend(["gravity".to_string(), gravity.to_string()]);
                }
                crop_tokens.extend(["crop".to_string(), c.to_token()]);
                crop_tokens
            })
            .unwrap_or_default();
        match self.scale_crop_order {
            ScaleCropOrder::ScaleFirst => {
                tokens.extend(thumbnail);
                tokens.extend(crop);
            }
            ScaleCropOrder::CropFirst => {
                tokens.extend(crop);
                tokens.extend(thumbnail);
            }
        }

        if let Some(blur) = &self.blur {
            if blur.sigma > 0 {
                tokens.extend(["blur".to_string(), format!("{}x{}", blur.radius, blur.sigma)]);
            }
        }
        if let Some(rotate) = &self.rotate {
            tokens.extend(["rotate".to_string(), rotate.angle.to_string()]);
            if let Some(background) = &rotate.background {
                tokens.extend(["background".to_string(), encode_base64_field(background)]);
            }
        }
        if let Some(format) = &self.format {
            tokens.extend(["format".to_string(), format.clone()]);
        }
        if self.interlace {
            tokens.extend(["interlace".to_string(), "1".to_string()]);
        }
        if self.quality != DEFAULT_QUALITY {
            tokens.extend(["quality".to_string(), self.quality.to_string()]);
        }
        tokens
    }
}
