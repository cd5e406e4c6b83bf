//! `avthumb` transcoding

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{parse_seconds, single_command, AutoScale, Resolution, AVTHUMB_COMMAND, VIDEO_FORMATS};
use crate::codec::command::join;
use crate::codec::envelope::encode_envelope;
use crate::codec::{parse_choice, parse_switch, Params, StyleCodec};
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::{Style, StyleType};
use crate::utils::number::{format_number, parse_u32, NumberSpec};

/// Formats that carry no video stream
pub const AUDIO_FORMATS: &[&str] = &["mp3", "aac", "m4a"];
pub const VIDEO_CODECS: &[&str] = &["libx264", "libx265", "libvpx", "copy"];
pub const AUDIO_CODECS: &[&str] = &["libfdk_aac", "libmp3lame", "libvorbis", "aac", "copy"];
pub const SAMPLE_RATES: &[u32] = &[8000, 11025, 16000, 22050, 32000, 44100, 48000, 96000];

const KEYS: &[&str] = &[
    "ss", "t", "vcodec", "vb", "r", "s", "autoscale", "acodec", "ab", "ar", "an",
];
const VIDEO_KEYS: &[&str] = &["vcodec", "vb", "r", "s", "autoscale"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitrateUnit {
    Bps,
    Kbps,
    Mbps,
}

impl BitrateUnit {
    fn suffix(&self) -> &'static str {
        match self {
            BitrateUnit::Bps => "",
            BitrateUnit::Kbps => "k",
            BitrateUnit::Mbps => "m",
        }
    }
}

/// Bitrate as written, e.g. `128k`, `1.5m` or `800000`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bitrate {
    pub value: f64,
    pub unit: BitrateUnit,
}

impl Bitrate {
    pub fn parse(token: &str) -> CommandResult<Self> {
        let (number, unit) = if let Some(n) = token.strip_suffix('k') {
            (n, BitrateUnit::Kbps)
        } else if let Some(n) = token.strip_suffix('m') {
            (n, BitrateUnit::Mbps)
        } else {
            (token, BitrateUnit::Bps)
        };
        let spec = match unit {
            BitrateUnit::Bps => NumberSpec::integer(1000.0, 100_000_000.0),
            BitrateUnit::Kbps => NumberSpec::decimal(2, 1.0, 100_000.0),
            BitrateUnit::Mbps => NumberSpec::decimal(3, 0.001, 100.0),
        };
        Ok(Self {
            value: spec.parse(number)?,
            unit,
        })
    }

    pub fn to_token(&self) -> String {
        format!("{}{}", format_number(self.value), self.unit.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTranscodeStyle {
    pub source_format: Option<String>,
    pub format: String,
    pub seek: Option<f64>,
    pub duration: Option<f64>,
    pub video_codec: Option<String>,
    pub video_bitrate: Option<Bitrate>,
    pub frame_rate: Option<f64>,
    pub resolution: Option<Resolution>,
    pub auto_scale: Option<AutoScale>,
    pub audio_codec: Option<String>,
    pub audio_bitrate: Option<Bitrate>,
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub strip_audio: bool,
}

impl VideoTranscodeStyle {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            source_format: None,
            format: format.into(),
            seek: None,
            duration: None,
            video_codec: None,
            video_bitrate: None,
            frame_rate: None,
            resolution: None,
            auto_scale: None,
            audio_codec: None,
            audio_bitrate: None,
            sample_rate: None,
            strip_audio: false,
        }
    }

    pub fn is_audio_only(&self) -> bool {
        AUDIO_FORMATS.contains(&self.format.as_str())
    }
}

fn parse_sample_rate(token: &str) -> CommandResult<u32> {
    let rate = parse_u32(token, 1, 96000)?;
    if SAMPLE_RATES.contains(&rate) {
        Ok(rate)
    } else {
        Err(CommandError::range(format!("unsupported sample rate {}", rate)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoTranscodeCodec;

impl VideoTranscodeCodec {
    pub fn new() -> Self {
        Self
    }
}

impl StyleCodec for VideoTranscodeCodec {
    type Form = VideoTranscodeStyle;

    const KIND: StyleType = StyleType::VideoTranscode;

    fn parse(&self, style: &Style) -> CommandResult<VideoTranscodeStyle> {
        trace!(commands = %style.commands, "parsing video transcode style");
        let (source_format, tokens) = single_command(&style.commands, "video transcode")?;
        if tokens[0] != AVTHUMB_COMMAND {
            return Err(CommandError::unsupported_command(tokens[0].as_str()));
        }
        let format = tokens.get(1).ok_or_else(|| {
            CommandError::structural(format!("{} requires an output format", AVTHUMB_COMMAND))
        })?;
        let mut form = VideoTranscodeStyle::new(parse_choice(
            format,
            &[VIDEO_FORMATS, AUDIO_FORMATS].concat(),
            "transcode format",
        )?);
        form.source_format = source_format;

        let params = Params::read(AVTHUMB_COMMAND, &tokens[2..], KEYS, &[])?;
        params.require_companion("autoscale", "s")?;
        if form.is_audio_only() {
            if let Some(key) = VIDEO_KEYS.iter().find(|key| params.has(key)) {
                return Err(CommandError::structural(format!(
                    "audio format {} cannot take video parameter '{}'",
                    form.format, key
                )));
            }
        }

        form.seek = params.get("ss").map(parse_seconds).transpose()?;
        form.duration = params
            .get("t")
            .map(|t| NumberSpec::decimal(3, 0.001, 0.0).without_max().parse(t))
            .transpose()?;
        form.video_codec = params
            .get("vcodec")
            .map(|c| parse_choice(c, VIDEO_CODECS, "video codec"))
            .transpose()?;
        form.video_bitrate = params.get("vb").map(Bitrate::parse).transpose()?;
        form.frame_rate = params
            .get("r")
            .map(|r| NumberSpec::decimal(3, 1.0, 60.0).parse(r))
            .transpose()?;
        form.resolution = params.get("s").map(Resolution::parse).transpose()?;
        form.auto_scale = params.get("autoscale").map(AutoScale::parse).transpose()?;
        form.audio_codec = params
            .get("acodec")
            .map(|c| parse_choice(c, AUDIO_CODECS, "audio codec"))
            .transpose()?;
        form.audio_bitrate = params.get("ab").map(Bitrate::parse).transpose()?;
        form.sample_rate = params.get("ar").map(parse_sample_rate).transpose()?;
        if let Some(an) = params.get("an") {
            form.strip_audio = parse_switch(an, "an")?;
        }
        if form.strip_audio && form.is_audio_only() {
            return Err(CommandError::structural(format!(
                "audio format {} cannot drop its audio stream",
                form.format
            )));
        }

        Ok(form)
    }

    fn generate_commands(&self, form: &VideoTranscodeStyle) -> String {
        let mut tokens = vec![AVTHUMB_COMMAND.to_string(), form.format.clone()];
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                tokens.extend([key.to_string(), value]);
            }
        };
        push("ss", form.seek.map(format_number));
        push("t", form.duration.map(format_number));
        push("vcodec", form.video_codec.clone());
        push("vb", form.video_bitrate.map(|b| b.to_token()));
        push("r", form.frame_rate.map(format_number));
        push("s", form.resolution.map(|r| r.to_token()));
        push(
            "autoscale",
            form.resolution
                .and(form.auto_scale)
                .map(|a| a.code().to_string()),
        );
        push("acodec", form.audio_codec.clone());
        push("ab", form.audio_bitrate.map(|b| b.to_token()));
        push("ar", form.sample_rate.map(|r| r.to_string()));
        push("an", form.strip_audio.then(|| "1".to_string()));
        encode_envelope(form.source_format.as_deref(), &join(&[tokens]))
    }

    fn output_format(&self, form: &VideoTranscodeStyle) -> Option<String> {
        Some(form.format.clone())
    }
}
