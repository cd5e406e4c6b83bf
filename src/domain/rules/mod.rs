// Domain rules - Classification of styles into edit modes and batch policies

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::envelope::is_source_format_scoped_equal;
use crate::codec::{
    ImageCodec, ImageStyle, StyleCodec, VideoCoverCodec, VideoCoverStyle, VideoTranscodeCodec,
    VideoTranscodeStyle, VideoWatermarkCodec, VideoWatermarkStyle,
};
use crate::domain::errors::CommandResult;
use crate::domain::model::{Style, StyleType};
use crate::utils::name::{is_force_persistence, validate_style_name};

/// Structured value of a style in the edit mode it was classified into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "form", rename_all = "snake_case")]
pub enum StyleForm {
    Image(ImageStyle),
    VideoCover(VideoCoverStyle),
    VideoWatermark(VideoWatermarkStyle),
    VideoTranscode(VideoTranscodeStyle),
    /// Raw commands that no structured codec accepts
    Manual(String),
}

impl StyleForm {
    pub fn style_type(&self) -> StyleType {
        match self {
            StyleForm::Image(_) => StyleType::Image,
            StyleForm::VideoCover(_) => StyleType::VideoCover,
            StyleForm::VideoWatermark(_) => StyleType::VideoWatermark,
            StyleForm::VideoTranscode(_) => StyleType::VideoTranscode,
            StyleForm::Manual(_) => StyleType::Manual,
        }
    }

    /// Canonical command string for this form
    pub fn commands(&self) -> String {
        match self {
            StyleForm::Image(form) => ImageCodec::new().generate_commands(form),
            StyleForm::VideoCover(form) => VideoCoverCodec::new().generate_commands(form),
            StyleForm::VideoWatermark(form) => VideoWatermarkCodec::new().generate_commands(form),
            StyleForm::VideoTranscode(form) => VideoTranscodeCodec::new().generate_commands(form),
            StyleForm::Manual(commands) => commands.clone(),
        }
    }

    /// Regenerate a style named `name` from this form
    pub fn generate(&self, name: &str) -> Style {
        match self {
            StyleForm::Image(form) => ImageCodec::new().generate(form, name),
            StyleForm::VideoCover(form) => VideoCoverCodec::new().generate(form, name),
            StyleForm::VideoWatermark(form) => VideoWatermarkCodec::new().generate(form, name),
            StyleForm::VideoTranscode(form) => VideoTranscodeCodec::new().generate(form, name),
            StyleForm::Manual(commands) => {
                Style::new(name, commands.clone()).with_persistence(is_force_persistence(commands))
            }
        }
    }

    /// Resolved output format; unknown for manual commands
    pub fn output_format(&self) -> Option<String> {
        match self {
            StyleForm::Image(form) => ImageCodec::new().output_format(form),
            StyleForm::VideoCover(form) => VideoCoverCodec::new().output_format(form),
            StyleForm::VideoWatermark(form) => VideoWatermarkCodec::new().output_format(form),
            StyleForm::VideoTranscode(form) => VideoTranscodeCodec::new().output_format(form),
            StyleForm::Manual(_) => None,
        }
    }
}

fn accept<C: StyleCodec>(codec: &C, style: &Style) -> Option<C::Form> {
    match codec.parse(style) {
        Ok(form) => Some(form),
        Err(err) => {
            debug!(kind = %C::KIND, name = %style.name, "codec rejected style: {}", err);
            None
        }
    }
}

/// Picks the edit mode for a style by trying each codec in priority order.
///
/// The order is Image, VideoCover, then VideoTranscode; the first codec that
/// parses the commands wins and anything left over is `Manual`. The video
/// watermark codec is not part of the order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleClassifier {
    image: ImageCodec,
    cover: VideoCoverCodec,
    watermark: VideoWatermarkCodec,
    transcode: VideoTranscodeCodec,
}

impl StyleClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, style: &Style) -> StyleType {
        self.parse(style).style_type()
    }

    /// Classify and return the winning codec's form
    pub fn parse(&self, style: &Style) -> StyleForm {
        if let Some(form) = accept(&self.image, style) {
            return StyleForm::Image(form);
        }
        if let Some(form) = accept(&self.cover, style) {
            return StyleForm::VideoCover(form);
        }
        if let Some(form) = accept(&self.transcode, style) {
            return StyleForm::VideoTranscode(form);
        }
        debug!(name = %style.name, "no codec accepted style, falling back to manual");
        StyleForm::Manual(style.commands.clone())
    }

    /// Parse with one specific codec, reporting why it rejects the style
    pub fn parse_as(&self, style_type: StyleType, style: &Style) -> CommandResult<StyleForm> {
        Ok(match style_type {
            StyleType::Image => StyleForm::Image(self.image.parse(style)?),
            StyleType::VideoCover => StyleForm::VideoCover(self.cover.parse(style)?),
            StyleType::VideoWatermark => StyleForm::VideoWatermark(self.watermark.parse(style)?),
            StyleType::VideoTranscode => StyleForm::VideoTranscode(self.transcode.parse(style)?),
            StyleType::Manual => StyleForm::Manual(style.commands.clone()),
        })
    }

    /// Whether `a` and `b` resolve to the same output format under `style_type`
    pub fn is_equal_output_format(&self, style_type: StyleType, a: &Style, b: &Style) -> bool {
        match style_type {
            StyleType::Image => self.image.is_equal_output_format(a, b),
            StyleType::VideoCover => self.cover.is_equal_output_format(a, b),
            StyleType::VideoWatermark => self.watermark.is_equal_output_format(a, b),
            StyleType::VideoTranscode => self.transcode.is_equal_output_format(a, b),
            StyleType::Manual => false,
        }
    }
}

/// Classification summary of one style in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub style_type: StyleType,
    pub output_format: Option<String>,
    pub persistence_enabled: bool,
    /// Why the name is invalid for the resolved output format, if it is
    pub name_error: Option<String>,
}

/// Helpers over a list of styles
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleBatch {
    classifier: StyleClassifier,
}

impl StyleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names used by more than one style, in order of first repetition
    pub fn duplicate_names(styles: &[Style]) -> Vec<String> {
        let mut duplicates: Vec<String> = Vec::new();
        for (i, style) in styles.iter().enumerate() {
            let seen_before = styles[..i].iter().any(|s| s.name == style.name);
            if seen_before && !duplicates.contains(&style.name) {
                duplicates.push(style.name.clone());
            }
        }
        duplicates
    }

    /// First style whose commands equal `commands`, envelope presence included
    pub fn find_equivalent<'a>(styles: &'a [Style], commands: &str) -> Option<&'a Style> {
        styles
            .iter()
            .find(|style| is_source_format_scoped_equal(&style.commands, commands))
    }

    /// Force persistence on for styles running expensive commands
    pub fn apply_persistence_policy(style: Style) -> Style {
        if !style.persistence_enabled && is_force_persistence(&style.commands) {
            debug!(name = %style.name, "forcing persistence for expensive commands");
            return style.with_persistence(true);
        }
        style
    }

    /// Classify every style and check its name against the resolved output
    /// format, treating suffixes outside `allowed_suffixes` as plain name text
    pub fn classify_all(
        &self,
        styles: &[Style],
        allowed_suffixes: Option<&[String]>,
    ) -> Vec<BatchEntry> {
        styles
            .iter()
            .map(|style| {
                let form = self.classifier.parse(style);
                let output_format = form.output_format();
                let name_error = validate_style_name(&style.name, output_format.as_deref(), allowed_suffixes)
                    .err()
                    .map(|err| err.to_string());
                BatchEntry {
                    name: style.name.clone(),
                    style_type: form.style_type(),
                    output_format,
                    persistence_enabled: Self::apply_persistence_policy(style.clone())
                        .persistence_enabled,
                    name_error,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
