//! Style command codecs
//!
//! Every transformation family has a codec that parses a [`Style`] into a
//! typed form and regenerates a canonical command string from that form.
//! The helpers here are shared by all codecs: the `key/value` token reader,
//! base64url fields and closed-vocabulary choices.

use std::fmt;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use tracing::{debug, trace};

use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{Style, StyleType};
use crate::utils::name::is_force_persistence;

pub mod command;
pub mod envelope;
pub mod image;
pub mod video;

pub use image::{ImageCodec, ImageStyle};
pub use video::{
    VideoCoverCodec, VideoCoverStyle, VideoTranscodeCodec, VideoTranscodeStyle,
    VideoWatermarkCodec, VideoWatermarkStyle,
};

/// Parse/generate pair for one transformation family
pub trait StyleCodec {
    /// Structured, editable value produced by [`StyleCodec::parse`]
    type Form: Clone + PartialEq + fmt::Debug;

    /// Edit mode this codec serves
    const KIND: StyleType;

    /// Parse the style's commands; the form is only returned on full success
    fn parse(&self, style: &Style) -> CommandResult<Self::Form>;

    /// Canonical command string for `form`, including the envelope
    fn generate_commands(&self, form: &Self::Form) -> String;

    /// Format of the files this form produces, `None` when it keeps the input format
    fn output_format(&self, form: &Self::Form) -> Option<String>;

    /// Build a style named `name` from `form`
    fn generate(&self, form: &Self::Form, name: &str) -> Style {
        let commands = self.generate_commands(form);
        let persistence = is_force_persistence(&commands);
        Style::new(name, commands).with_persistence(persistence)
    }

    /// Whether `style` parses under this codec
    fn is_supported(&self, style: &Style) -> bool {
        match self.parse(style) {
            Ok(_) => true,
            Err(err) => {
                debug!(kind = %Self::KIND, commands = %style.commands, "style rejected: {}", err);
                false
            }
        }
    }

    /// Whether both styles parse under this codec and resolve to the same output format
    fn is_equal_output_format(&self, a: &Style, b: &Style) -> bool {
        match (self.parse(a), self.parse(b)) {
            (Ok(a), Ok(b)) => self.output_format(&a) == self.output_format(&b),
            _ => false,
        }
    }
}

/// One `key/value` pair or bare flag of a sub-command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Param<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

/// Ordered, duplicate-free parameters of one sub-command
#[derive(Debug, Clone)]
pub(crate) struct Params<'a> {
    command: &'a str,
    entries: Vec<Param<'a>>,
}

impl<'a> Params<'a> {
    /// Read `tokens` as `key/value` pairs from a closed vocabulary.
    ///
    /// `flags` are keys that stand alone without a value.
    pub fn read(
        command: &'a str,
        tokens: &'a [String],
        keys: &[&str],
        flags: &[&str],
    ) -> CommandResult<Self> {
        trace!(command, ?tokens, "reading parameters");
        let mut entries: Vec<Param<'a>> = Vec::new();
        let mut iter = tokens.iter();

        while let Some(token) = iter.next() {
            let key = token.as_str();
            let value = if flags.contains(&key) {
                None
            } else if keys.contains(&key) {
                match iter.next() {
                    Some(value) => Some(value.as_str()),
                    None => {
                        return Err(CommandError::structural(format!(
                            "{} parameter '{}' has no value",
                            command, key
                        )))
                    }
                }
            } else {
                return Err(CommandError::unsupported_parameter(command, key));
            };

            if entries.iter().any(|p| p.key == key) {
                return Err(CommandError::structural(format!(
                    "{} parameter '{}' appears more than once",
                    command, key
                )));
            }
            entries.push(Param { key, value });
        }

        Ok(Self { command, entries })
    }

    pub fn command(&self) -> &'a str {
        self.command
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|p| p.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|p| p.key == key)
    }

    /// Value of `key`, or a structural error naming the missing key
    pub fn require(&self, key: &str) -> CommandResult<&'a str> {
        self.get(key).ok_or_else(|| {
            CommandError::structural(format!(
                "{} requires parameter '{}'",
                self.command, key
            ))
        })
    }

    /// Fail unless `companion` is present whenever `key` is
    pub fn require_companion(&self, key: &str, companion: &str) -> CommandResult<()> {
        if self.has(key) && !self.has(companion) {
            return Err(CommandError::structural(format!(
                "{} parameter '{}' requires '{}'",
                self.command, key, companion
            )));
        }
        Ok(())
    }

    /// Accept a reserved key only when it carries its default value
    pub fn ensure_default(&self, key: &str, default: &str) -> CommandResult<()> {
        match self.get(key) {
            Some(value) if value != default => {
                Err(CommandError::unsupported_parameter(self.command, key))
            }
            _ => Ok(()),
        }
    }
}

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64url field into UTF-8 text
pub(crate) fn decode_base64_field(token: &str, field: &str) -> CommandResult<String> {
    let expected = format!("base64url encoded {}", field);
    let bytes = URL_SAFE_LENIENT
        .decode(token)
        .map_err(|_| CommandError::syntax(token, expected.clone()))?;
    String::from_utf8(bytes).map_err(|_| CommandError::syntax(token, expected))
}

/// Encode text as a padded base64url field
pub(crate) fn encode_base64_field(value: &str) -> String {
    URL_SAFE.encode(value.as_bytes())
}

/// Match `token` against a closed vocabulary
pub(crate) fn parse_choice(token: &str, choices: &[&str], expected: &str) -> CommandResult<String> {
    if choices.contains(&token) {
        Ok(token.to_string())
    } else {
        Err(CommandError::syntax(token, expected))
    }
}

/// Parse a `0`/`1` switch
pub(crate) fn parse_switch(token: &str, key: &str) -> CommandResult<bool> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(CommandError::syntax(token, format!("{} switch (0 or 1)", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn tokens(raw: &str) -> Vec<String> {
        raw.split('/').map(str::to_string).collect()
    }

    #[test]
    fn test_params_read_pairs_and_flags() {
        let toks = tokens("auto-orient/thumbnail/100x/quality/80");
        let params = Params::read("imageMogr2", &toks, &["thumbnail", "quality"], &["auto-orient"])
            .unwrap();
        assert!(params.has("auto-orient"));
        assert_eq!(params.get("auto-orient"), None);
        assert_eq!(params.get("thumbnail"), Some("100x"));
        assert_eq!(params.position("quality"), Some(2));
        assert_eq!(params.command(), "imageMogr2");
    }

    #[test]
    fn test_params_errors() {
        let toks = tokens("w/100/h");
        let err = Params::read("imageView2", &toks, &["w", "h"], &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);

        let toks = tokens("w/100/w/200");
        let err = Params::read("imageView2", &toks, &["w", "h"], &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);

        let toks = tokens("colors/2");
        let err = Params::read("imageView2", &toks, &["w", "h"], &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedParameter);
    }

    #[test]
    fn test_params_companions_and_defaults() {
        let toks = tokens("ws/0/gravity/North");
        let params = Params::read("watermark", &toks, &["ws", "gravity", "dx"], &[]).unwrap();
        assert!(params.ensure_default("ws", "0").is_ok());
        assert!(params.ensure_default("dx", "10").is_ok());
        assert!(params.require_companion("gravity", "dx").is_err());
        assert!(params.require("dx").is_err());

        let toks = tokens("ws/0.5");
        let params = Params::read("watermark", &toks, &["ws"], &[]).unwrap();
        assert_eq!(
            params.ensure_default("ws", "0").unwrap_err().kind(),
            ErrorKind::UnsupportedParameter
        );
    }

    #[test]
    fn test_base64_fields() {
        assert_eq!(encode_base64_field("七牛"), "5LiD54mb");
        assert_eq!(decode_base64_field("5LiD54mb", "text").unwrap(), "七牛");
        assert_eq!(encode_base64_field("a"), "YQ==");
        assert_eq!(decode_base64_field("YQ", "text").unwrap(), "a");
        assert_eq!(decode_base64_field("YQ==", "text").unwrap(), "a");
        assert_eq!(
            decode_base64_field("***", "text").unwrap_err().kind(),
            ErrorKind::Syntax
        );
    }

    #[test]
    fn test_switch_and_choice() {
        assert!(parse_switch("1", "interlace").unwrap());
        assert!(!parse_switch("0", "interlace").unwrap());
        assert!(parse_switch("2", "interlace").is_err());
        assert_eq!(parse_choice("png", &["jpg", "png"], "format").unwrap(), "png");
        assert!(parse_choice("PNG", &["jpg", "png"], "format").is_err());
    }
}
