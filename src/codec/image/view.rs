//! `imageView2` basic scaling

use serde::{Deserialize, Serialize};

use super::{DEFAULT_QUALITY, IMAGE_FORMATS};
use crate::codec::{parse_choice, parse_switch, Params};
use crate::domain::errors::{CommandError, CommandResult};
use crate::utils::number::parse_u32;

pub const COMMAND: &str = "imageView2";

const KEYS: &[&str] = &["w", "h", "format", "interlace", "q"];

/// How `w` and `h` bound the output, selected by the positional mode `0`-`5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// 0: long edge at most `w`, short edge at most `h`
    LongShortContain,
    /// 1: cover `w`x`h`, then crop the center
    CenterCropCover,
    /// 2: fit inside `w`x`h`
    Contain,
    /// 3: cover `w`x`h` without cropping
    Cover,
    /// 4: long edge at least `w`, short edge at least `h`
    LongShortCover,
    /// 5: long/short edge cover, then crop the center
    LongShortCenterCrop,
}

impl ScaleMode {
    pub fn code(&self) -> u32 {
        match self {
            ScaleMode::LongShortContain => 0,
            ScaleMode::CenterCropCover => 1,
            ScaleMode::Contain => 2,
            ScaleMode::Cover => 3,
            ScaleMode::LongShortCover => 4,
            ScaleMode::LongShortCenterCrop => 5,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ScaleMode::LongShortContain),
            1 => Some(ScaleMode::CenterCropCover),
            2 => Some(ScaleMode::Contain),
            3 => Some(ScaleMode::Cover),
            4 => Some(ScaleMode::LongShortCover),
            5 => Some(ScaleMode::LongShortCenterCrop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageView {
    pub mode: ScaleMode,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    #[serde(default)]
    pub interlace: bool,
    #[serde(default = "default_quality")]
    pub quality: u32,
}

fn default_quality() -> u32 {
    DEFAULT_QUALITY
}

impl ImageView {
    pub fn new(mode: ScaleMode) -> Self {
        Self {
            mode,
            width: None,
            height: None,
            format: None,
            interlace: false,
            quality: DEFAULT_QUALITY,
        }
    }

    /// Parse the tokens of an `imageView2` sub-command, name included
    pub fn parse(tokens: &[String]) -> CommandResult<Self> {
        let mode_token = tokens.get(1).ok_or_else(|| {
            CommandError::structural(format!("{} requires a scale mode", COMMAND))
        })?;
        let code = parse_u32(mode_token, 0, 5)?;
        let mode = ScaleMode::from_code(code)
            .ok_or_else(|| CommandError::range(format!("unknown scale mode {}", code)))?;

        let params = Params::read(COMMAND, &tokens[2..], KEYS, &[])?;
        let mut view = Self::new(mode);

        if let Some(w) = params.get("w") {
            view.width = Some(parse_u32(w, 1, 9999)?);
        }
        if let Some(h) = params.get("h") {
            view.height = Some(parse_u32(h, 1, 9999)?);
        }
        if view.width.is_none() && view.height.is_none() {
            return Err(CommandError::structural(format!(
                "{} requires 'w' or 'h'",
                COMMAND
            )));
        }
        if let Some(format) = params.get("format") {
            view.format = Some(parse_choice(format, IMAGE_FORMATS, "image format")?);
        }
        if let Some(interlace) = params.get("interlace") {
            view.interlace = parse_switch(interlace, "interlace")?;
        }
        if let Some(q) = params.get("q") {
            view.quality = parse_u32(q, 1, 100)?;
        }

        Ok(view)
    }

    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = vec![COMMAND.to_string(), self.mode.code().to_string()];
        if let Some(w) = self.width {
            tokens.extend(["w".to_string(), w.to_string()]);
        }
        if let Some(h) = self.height {
            tokens.extend(["h".to_string(), h.to_string()]);
        }
        if let Some(format) = &self.format {
            tokens.extend(["format".to_string(), format.clone()]);
        }
        if self.interlace {
            tokens.extend(["interlace".to_string(), "1".to_string()]);
        }
        if self.quality != DEFAULT_QUALITY {
            tokens.extend(["q".to_string(), self.quality.to_string()]);
        }
        tokens
    }
}
