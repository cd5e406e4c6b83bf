// Unit tests for the video codecs

use super::*;
use crate::codec::{encode_base64_field, StyleCodec};
use crate::domain::errors::{CommandResult, ErrorKind};
use crate::domain::model::{Gravity, Style};

fn cover(commands: &str) -> CommandResult<VideoCoverStyle> {
    VideoCoverCodec::new().parse(&Style::new("cover", commands))
}

fn transcode(commands: &str) -> CommandResult<VideoTranscodeStyle> {
    VideoTranscodeCodec::new().parse(&Style::new("transcode", commands))
}

fn watermark(commands: &str) -> CommandResult<VideoWatermarkStyle> {
    VideoWatermarkCodec::new().parse(&Style::new("watermark", commands))
}

#[test]
fn test_resolution_rules() {
    assert_eq!(
        Resolution::parse("1920x1080").unwrap(),
        Resolution {
            width: 1920,
            height: 1080
        }
    );
    assert!(Resolution::parse("3840x2160").is_ok());
    assert_eq!(Resolution::parse("2200x2200").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(Resolution::parse("0x100").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(Resolution::parse("4000x100").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(Resolution::parse("1920*1080").unwrap_err().kind(), ErrorKind::Syntax);
}

#[test]
fn test_animated_cover_rejects_ultra_resolution() {
    let err = cover("avthumb/gif/ss/0.1/s/2200x2200/t/5/autoscale/2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn test_animated_cover_scenario() {
    let form = cover("avthumb/gif/ss/0.1/s/100x100/t/5/autoscale/2").unwrap();
    assert_eq!(form.source_format, None);
    assert_eq!(form.cover.format(), "gif");
    match form.cover {
        VideoCover::Animated(animated) => {
            assert_eq!(animated.offset, 0.1);
            assert_eq!(animated.duration, 5.0);
            assert_eq!(
                animated.resolution,
                Some(Resolution {
                    width: 100,
                    height: 100
                })
            );
            assert_eq!(animated.auto_scale, Some(AutoScale::Fill));
        }
        other => panic!("expected animated cover, got {:?}", other),
    }
}

#[test]
fn test_animated_cover_round_trip() {
    let codec = VideoCoverCodec::new();
    let commands = "$0.mp4?avthumb/gif/ss/0.1/s/100x100/t/5/autoscale/2";
    let form = cover(commands).unwrap();
    assert_eq!(form.source_format.as_deref(), Some("mp4"));
    assert_eq!(codec.generate_commands(&form), commands);
}

#[test]
fn test_animated_cover_field_rules() {
    assert_eq!(cover("avthumb/gif/t/5").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(cover("avthumb/gif/ss/1").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(
        cover("avthumb/gif/ss/1/t/5/autoscale/1").unwrap_err().kind(),
        ErrorKind::Structural
    );
    assert_eq!(
        cover("avthumb/gif/ss/1/t/5/s/100x100/autoscale/3").unwrap_err().kind(),
        ErrorKind::Range
    );
    assert_eq!(cover("avthumb/gif/ss/1/t/0").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(cover("avthumb/gif/ss/1.0001/t/5").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(cover("avthumb/gif/ss/-1/t/5").unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(
        cover("avthumb/mp4/ss/1/t/5").unwrap_err().kind(),
        ErrorKind::UnsupportedCommand
    );
}

#[test]
fn test_static_cover_parse_and_generate() {
    let codec = VideoCoverCodec::new();
    let form = cover("vframe/jpg/offset/7/w/480/h/360/rotate/auto").unwrap();
    match &form.cover {
        VideoCover::Static(frame) => {
            assert_eq!(frame.format, "jpg");
            assert_eq!(frame.offset, 7.0);
            assert_eq!(frame.width, Some(480));
            assert_eq!(frame.height, Some(360));
            assert_eq!(frame.rotate, Some(FrameRotate::Auto));
        }
        other => panic!("expected static cover, got {:?}", other),
    }
    assert_eq!(
        codec.generate_commands(&form),
        "vframe/jpg/offset/7/w/480/h/360/rotate/auto"
    );
    assert_eq!(codec.output_format(&form).as_deref(), Some("jpg"));
}

#[test]
fn test_static_cover_field_rules() {
    assert_eq!(cover("vframe/jpg").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(cover("vframe").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(cover("vframe/bmp/offset/1").unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(
        cover("vframe/png/offset/1/rotate/45").unwrap_err().kind(),
        ErrorKind::Syntax
    );
    assert_eq!(
        cover("vframe/png/offset/1/w/3000/h/3000").unwrap_err().kind(),
        ErrorKind::Range
    );
    assert_eq!(
        cover("vframe/png/offset/1/colors/2").unwrap_err().kind(),
        ErrorKind::UnsupportedParameter
    );
}

#[test]
fn test_cover_rejects_multiple_commands() {
    assert_eq!(
        cover("vframe/jpg/offset/1|imageslim").unwrap_err().kind(),
        ErrorKind::Structural
    );
    assert_eq!(cover("").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(
        cover("imageView2/1/w/100").unwrap_err().kind(),
        ErrorKind::UnsupportedCommand
    );
}

#[test]
fn test_transcode_parse() {
    let form = transcode("avthumb/mp4/ss/10/t/30.5/vcodec/libx264/vb/1.5m/r/30/s/1280x720/autoscale/1/acodec/libfdk_aac/ab/128k/ar/44100").unwrap();
    assert_eq!(form.format, "mp4");
    assert_eq!(form.seek, Some(10.0));
    assert_eq!(form.duration, Some(30.5));
    assert_eq!(form.video_codec.as_deref(), Some("libx264"));
    assert_eq!(
        form.video_bitrate,
        Some(Bitrate {
            value: 1.5,
            unit: BitrateUnit::Mbps
        })
    );
    assert_eq!(form.frame_rate, Some(30.0));
    assert_eq!(form.auto_scale, Some(AutoScale::Fit));
    assert_eq!(form.audio_bitrate.map(|b| b.to_token()).as_deref(), Some("128k"));
    assert_eq!(form.sample_rate, Some(44100));
    assert!(!form.strip_audio);
}

#[test]
fn test_transcode_canonical_order() {
    let codec = VideoTranscodeCodec::new();
    let form = transcode("avthumb/mp4/an/1/s/640x360/ss/5/vcodec/libx265").unwrap();
    assert_eq!(
        codec.generate_commands(&form),
        "avthumb/mp4/ss/5/vcodec/libx265/s/640x360/an/1"
    );

    let canonical = "$0.mov?avthumb/webm/t/12/vcodec/libvpx/vb/800k/r/25/acodec/libvorbis/ar/48000";
    let form = transcode(canonical).unwrap();
    assert_eq!(codec.generate_commands(&form), canonical);
}

#[test]
fn test_transcode_audio_only_formats() {
    let form = transcode("avthumb/mp3/ab/192k/ar/44100").unwrap();
    assert!(form.is_audio_only());
    assert_eq!(
        transcode("avthumb/mp3/s/640x360").unwrap_err().kind(),
        ErrorKind::Structural
    );
    assert_eq!(
        transcode("avthumb/aac/an/1").unwrap_err().kind(),
        ErrorKind::Structural
    );
}

#[test]
fn test_transcode_field_rules() {
    assert_eq!(transcode("avthumb").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(transcode("avthumb/avi").unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(
        transcode("avthumb/mp4/ar/12345").unwrap_err().kind(),
        ErrorKind::Range
    );
    assert_eq!(transcode("avthumb/mp4/r/61").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(transcode("avthumb/mp4/vb/fast").unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(
        transcode("avthumb/mp4/autoscale/1").unwrap_err().kind(),
        ErrorKind::Structural
    );
    assert_eq!(
        transcode("avthumb/mp4/wmText/YQ==").unwrap_err().kind(),
        ErrorKind::UnsupportedParameter
    );
    assert_eq!(
        transcode("vframe/jpg/offset/1").unwrap_err().kind(),
        ErrorKind::UnsupportedCommand
    );
}

#[test]
fn test_bitrate_tokens() {
    assert_eq!(Bitrate::parse("800000").unwrap().unit, BitrateUnit::Bps);
    assert_eq!(Bitrate::parse("128k").unwrap().to_token(), "128k");
    assert_eq!(Bitrate::parse("1.5m").unwrap().to_token(), "1.5m");
    assert_eq!(Bitrate::parse("999").unwrap_err().kind(), ErrorKind::Range);
    assert_eq!(Bitrate::parse("k").unwrap_err().kind(), ErrorKind::Syntax);
}

#[test]
fn test_watermark_timeline_requires_both_keys() {
    let text = encode_base64_field("qiniu");
    let pos_only = format!("avthumb/mp4/wmText/{}/wmPos/5", text);
    assert_eq!(watermark(&pos_only).unwrap_err().kind(), ErrorKind::Structural);

    let duration_only = format!("avthumb/mp4/wmText/{}/wmDuration/5", text);
    assert_eq!(
        watermark(&duration_only).unwrap_err().kind(),
        ErrorKind::Structural
    );
}

#[test]
fn test_watermark_reverse_timeline() {
    let text = encode_base64_field("qiniu");
    let form = watermark(&format!(
        "avthumb/mp4/wmText/{}/wmPos/$(end)/wmDuration/-5",
        text
    ))
    .unwrap();
    assert_eq!(
        form.timeline,
        Some(Timeline {
            position: TimelinePosition::End,
            duration: -5.0
        })
    );
}

#[test]
fn test_watermark_timeline_sign_rules() {
    let text = encode_base64_field("qiniu");
    let negative_from_start = format!("avthumb/mp4/wmText/{}/wmPos/10/wmDuration/-5", text);
    assert_eq!(
        watermark(&negative_from_start).unwrap_err().kind(),
        ErrorKind::Range
    );

    let positive_from_end = format!("avthumb/mp4/wmText/{}/wmPos/$(end)/wmDuration/5", text);
    assert_eq!(
        watermark(&positive_from_end).unwrap_err().kind(),
        ErrorKind::Range
    );

    let too_late = format!("avthumb/mp4/wmText/{}/wmPos/180001/wmDuration/5", text);
    assert_eq!(watermark(&too_late).unwrap_err().kind(), ErrorKind::Range);

    let form = watermark(&format!(
        "avthumb/mp4/wmText/{}/wmPos/10/wmDuration/0",
        text
    ))
    .unwrap();
    assert_eq!(
        form.timeline,
        Some(Timeline {
            position: TimelinePosition::At(10.0),
            duration: 0.0
        })
    );
}

#[test]
fn test_watermark_image_content() {
    let url = "https://example.com/logo.png";
    let form = watermark(&format!(
        "avthumb/flv/wmImage/{}/wmGravity/SouthWest/wmOffsetX/-20/wmOffsetY/15",
        encode_base64_field(url)
    ))
    .unwrap();
    assert_eq!(form.format, "flv");
    assert_eq!(
        form.content,
        VideoWatermarkContent::Image {
            url: url.to_string(),
            gravity: Gravity::SouthWest
        }
    );
    assert_eq!(form.offset_x, -20);
    assert_eq!(form.offset_y, 15);
    assert_eq!(form.timeline, None);
}

#[test]
fn test_watermark_text_defaults_and_round_trip() {
    let codec = VideoWatermarkCodec::new();
    let form = watermark(&format!("avthumb/mp4/wmText/{}", encode_base64_field("七牛")))
        .unwrap();
    match &form.content {
        VideoWatermarkContent::Text {
            text,
            gravity,
            font,
            color,
            font_size,
        } => {
            assert_eq!(text, "七牛");
            assert_eq!(*gravity, watermark::DEFAULT_GRAVITY);
            assert_eq!(font, watermark::DEFAULT_FONT);
            assert_eq!(color, watermark::DEFAULT_FONT_COLOR);
            assert_eq!(*font_size, watermark::DEFAULT_FONT_SIZE);
        }
        other => panic!("expected text watermark, got {:?}", other),
    }

    let regenerated = codec.generate_commands(&form);
    assert_eq!(watermark(&regenerated).unwrap(), form);
    assert_eq!(codec.output_format(&form).as_deref(), Some("mp4"));
}

#[test]
fn test_watermark_content_rules() {
    let text = encode_base64_field("qiniu");
    let image = encode_base64_field("https://example.com/a.png");

    assert_eq!(watermark("avthumb/mp4").unwrap_err().kind(), ErrorKind::Structural);
    assert_eq!(
        watermark(&format!("avthumb/mp4/wmText/{}/wmImage/{}", text, image))
            .unwrap_err()
            .kind(),
        ErrorKind::Structural
    );
    assert_eq!(
        watermark(&format!("avthumb/mp4/wmImage/{}/wmFontSize/20", image))
            .unwrap_err()
            .kind(),
        ErrorKind::Structural
    );
    assert_eq!(
        watermark(&format!("avthumb/mp4/wmText/{}/wmFontSize/1001", text))
            .unwrap_err()
            .kind(),
        ErrorKind::Range
    );
    assert_eq!(
        watermark(&format!("avthumb/mp4/wmText/{}/wmOffsetX/+3", text))
            .unwrap_err()
            .kind(),
        ErrorKind::Syntax
    );
    assert_eq!(
        watermark(&format!(
            "avthumb/mp4/wmImage/{}",
            encode_base64_field("ftp://example.com/a.png")
        ))
        .unwrap_err()
        .kind(),
        ErrorKind::Syntax
    );
    assert_eq!(
        watermark(&format!("avthumb/mp4/wmText/{}/vb/128k", text))
            .unwrap_err()
            .kind(),
        ErrorKind::UnsupportedParameter
    );
}
