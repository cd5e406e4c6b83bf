// Unit tests for domain models

use super::*;
use crate::domain::errors::ErrorKind;

#[test]
fn test_style_envelope_accessors() {
    let style = Style::new("small.jpg", "$0.jpg?imageView2/0/w/240/h/180");
    assert_eq!(style.source_format(), Some("jpg".to_string()));
    assert_eq!(style.body(), "imageView2/0/w/240/h/180");
    assert!(!style.persistence_enabled);

    let plain = Style::new("small", "imageView2/0/w/240");
    assert_eq!(plain.source_format(), None);
    assert_eq!(plain.body(), "imageView2/0/w/240");
}

#[test]
fn test_style_deserialize_defaults_persistence() {
    let style: Style =
        serde_json::from_str(r#"{"name":"a","commands":"imageslim"}"#).unwrap();
    assert!(!style.persistence_enabled);
    assert_eq!(style, Style::new("a", "imageslim"));
}

#[test]
fn test_style_type_parsing() {
    assert_eq!(StyleType::parse("image").unwrap(), StyleType::Image);
    assert_eq!(StyleType::parse("VIDEO-COVER").unwrap(), StyleType::VideoCover);
    assert_eq!(
        StyleType::parse("video_transcode").unwrap(),
        StyleType::VideoTranscode
    );
    assert!(StyleType::parse("audio").is_err());
    assert_eq!(StyleType::VideoWatermark.to_string(), "video_watermark");
}

#[test]
fn test_gravity_parse_is_case_sensitive() {
    for gravity in Gravity::ALL {
        assert_eq!(Gravity::parse(gravity.as_str()).unwrap(), gravity);
    }
    let err = Gravity::parse("center").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(Gravity::default(), Gravity::SouthEast);
}

#[test]
fn test_hex_color() {
    assert_eq!(parse_hex_color("#00ff7F").unwrap(), "#00ff7F");
    assert!(parse_hex_color("00ff7F").is_err());
    assert!(parse_hex_color("#00ff7").is_err());
    assert!(parse_hex_color("#00ff7G").is_err());
}
