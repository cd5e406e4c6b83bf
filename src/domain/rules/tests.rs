// Unit tests for classification and batch rules

use super::*;
use crate::codec::encode_base64_field;

fn style(commands: &str) -> Style {
    Style::new("test", commands)
}

#[test]
fn test_classifier_priority() {
    let classifier = StyleClassifier::new();
    assert_eq!(
        classifier.classify(&style("imageView2/1/w/240/h/180")),
        StyleType::Image
    );
    assert_eq!(
        classifier.classify(&style("$0.jpg?imageMogr2/thumbnail/100x|imageslim")),
        StyleType::Image
    );
    assert_eq!(
        classifier.classify(&style("vframe/jpg/offset/1")),
        StyleType::VideoCover
    );
    assert_eq!(
        classifier.classify(&style("avthumb/gif/ss/0.1/s/100x100/t/5/autoscale/2")),
        StyleType::VideoCover
    );
    assert_eq!(
        classifier.classify(&style("avthumb/mp4/s/1280x720/vb/1.5m")),
        StyleType::VideoTranscode
    );
}

#[test]
fn test_classifier_falls_back_to_manual() {
    let classifier = StyleClassifier::new();
    for commands in [
        "",
        "imageView2/1/w/240/h/180|imageMogr2/thumbnail/100x",
        "avthumb/gif/ss/0.1/s/2200x2200/t/5",
        "avhls/64k",
        "imageView2/1/w/240/colors/2",
    ] {
        let form = classifier.parse(&style(commands));
        assert_eq!(form, StyleForm::Manual(commands.to_string()), "{:?}", commands);
    }
}

#[test]
fn test_video_watermark_is_never_classified() {
    let classifier = StyleClassifier::new();
    let commands = format!("avthumb/mp4/wmText/{}", encode_base64_field("qiniu"));
    let s = style(&commands);
    assert_eq!(classifier.classify(&s), StyleType::Manual);

    let form = classifier.parse_as(StyleType::VideoWatermark, &s).unwrap();
    assert_eq!(form.style_type(), StyleType::VideoWatermark);
    assert_eq!(form.output_format().as_deref(), Some("mp4"));
}

#[test]
fn test_classifier_is_deterministic() {
    let classifier = StyleClassifier::new();
    let s = style("$0.png?imageMogr2/auto-orient/thumbnail/!50p/format/webp");
    let first = classifier.parse(&s);
    for _ in 0..5 {
        assert_eq!(classifier.parse(&s), first);
    }
}

#[test]
fn test_parse_as_reports_errors() {
    let classifier = StyleClassifier::new();
    let s = style("avthumb/gif/ss/0.1/s/2200x2200/t/5");
    let err = classifier.parse_as(StyleType::VideoCover, &s).unwrap_err();
    assert_eq!(err.kind(), crate::domain::errors::ErrorKind::Range);
    assert_eq!(
        classifier.parse_as(StyleType::Manual, &s).unwrap(),
        StyleForm::Manual(s.commands.clone())
    );
}

#[test]
fn test_form_generate_round_trip() {
    let classifier = StyleClassifier::new();
    for commands in [
        "imageView2/1/w/240/h/180",
        "$0.mp4?vframe/png/offset/3.5/w/320",
        "avthumb/mp4/ss/5/t/10",
    ] {
        let form = classifier.parse(&style(commands));
        let regenerated = form.generate("copy");
        assert_eq!(regenerated.name, "copy");
        assert_eq!(regenerated.commands, commands);
        assert_eq!(classifier.parse(&regenerated), form);
    }

    let manual = StyleForm::Manual("avhls/64k".to_string()).generate("hls");
    assert_eq!(manual.commands, "avhls/64k");
    assert!(manual.persistence_enabled);
}

#[test]
fn test_generate_forces_persistence_for_video() {
    let classifier = StyleClassifier::new();
    let cover = classifier.parse(&style("vframe/jpg/offset/1")).generate("cover.jpg");
    assert!(cover.persistence_enabled);
    let image = classifier.parse(&style("imageView2/2/w/100")).generate("thumb");
    assert!(!image.persistence_enabled);
}

#[test]
fn test_is_equal_output_format() {
    let classifier = StyleClassifier::new();
    let a = style("$0.jpg?imageView2/1/w/100");
    let b = style("$0.jpg?imageMogr2/thumbnail/200x");
    let c = style("$0.jpg?imageView2/1/w/100/format/png");
    assert!(classifier.is_equal_output_format(StyleType::Image, &a, &b));
    assert!(!classifier.is_equal_output_format(StyleType::Image, &a, &c));
    assert!(!classifier.is_equal_output_format(StyleType::VideoCover, &a, &b));
    assert!(!classifier.is_equal_output_format(StyleType::Manual, &a, &a));

    let mp4 = style("avthumb/mp4/ss/1");
    let also_mp4 = style("avthumb/mp4/vcodec/libx264");
    let webm = style("avthumb/webm");
    assert!(classifier.is_equal_output_format(StyleType::VideoTranscode, &mp4, &also_mp4));
    assert!(!classifier.is_equal_output_format(StyleType::VideoTranscode, &mp4, &webm));
}

#[test]
fn test_duplicate_names() {
    let styles = vec![
        Style::new("a", "imageslim"),
        Style::new("b", "imageslim"),
        Style::new("a", "imageView2/1/w/1"),
        Style::new("b", "imageslim"),
        Style::new("a", "imageslim"),
        Style::new("c", "imageslim"),
    ];
    assert_eq!(StyleBatch::duplicate_names(&styles), vec!["a", "b"]);
    assert!(StyleBatch::duplicate_names(&styles[..2]).is_empty());
}

#[test]
fn test_find_equivalent() {
    let styles = vec![
        Style::new("plain", "imageView2/1/w/100"),
        Style::new("scoped", "$0.png?imageView2/1/w/100"),
    ];
    assert_eq!(
        StyleBatch::find_equivalent(&styles, "$0.jpg?imageView2/1/w/100").map(|s| s.name.as_str()),
        Some("scoped")
    );
    assert_eq!(
        StyleBatch::find_equivalent(&styles, "imageView2/1/w/100").map(|s| s.name.as_str()),
        Some("plain")
    );
    assert!(StyleBatch::find_equivalent(&styles, "imageView2/1/w/200").is_none());
}

#[test]
fn test_apply_persistence_policy() {
    let forced = StyleBatch::apply_persistence_policy(Style::new("v", "avthumb/mp4"));
    assert!(forced.persistence_enabled);

    let untouched = StyleBatch::apply_persistence_policy(Style::new("i", "imageslim"));
    assert!(!untouched.persistence_enabled);

    let kept = StyleBatch::apply_persistence_policy(
        Style::new("i", "imageslim").with_persistence(true),
    );
    assert!(kept.persistence_enabled);
}

#[test]
fn test_classify_all() {
    let batch = StyleBatch::new();
    let styles = vec![
        Style::new("small.jpg", "$0.jpg?imageView2/1/w/240/h/180"),
        Style::new("cover.png", "vframe/jpg/offset/1"),
        Style::new("raw", "avhls/64k"),
    ];
    let entries = batch.classify_all(&styles, None);
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].style_type, StyleType::Image);
    assert_eq!(entries[0].output_format.as_deref(), Some("jpg"));
    assert!(entries[0].name_error.is_none());
    assert!(!entries[0].persistence_enabled);

    assert_eq!(entries[1].style_type, StyleType::VideoCover);
    assert!(entries[1].persistence_enabled);
    assert!(entries[1].name_error.is_some());

    assert_eq!(entries[2].style_type, StyleType::Manual);
    assert_eq!(entries[2].output_format, None);
    assert!(entries[2].persistence_enabled);
}

#[test]
fn test_classify_all_respects_allowed_suffixes() {
    let styles = vec![
        Style::new("thumb.v2", "imageView2/1/w/100/format/jpg"),
        Style::new("thumb.png", "imageView2/1/w/100/format/jpg"),
    ];
    let allowed = vec!["jpg".to_string(), "png".to_string()];

    let strict = StyleBatch::new().classify_all(&styles, None);
    assert!(strict[0].name_error.is_some());

    let lenient = StyleBatch::new().classify_all(&styles, Some(allowed.as_slice()));
    assert!(lenient[0].name_error.is_none());
    assert!(lenient[1].name_error.is_some());
}
