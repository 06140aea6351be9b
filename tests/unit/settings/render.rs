use super::*;
use serde_json::json;

#[test]
fn defaults_match_documented_values() {
    let s = RenderSettings::default();
    assert_eq!(s.interval_padding, 1.0);
    assert!(s.crop_roi && s.draw_trajectories && s.draw_label && s.highlight);
    assert_eq!(s.roi_padding, 100);
    assert_eq!(s.actor_color.to_hex(), "#ff6965");
    assert_eq!(s.recipient_color.to_hex(), "#65d4ff");
    assert_eq!(s.other_color.to_hex(), "#e6e6e6");
    assert_eq!(s.highlight_color.to_hex(), "#fc0000");
    assert_eq!(s.size_preset, SizePreset::FullHd);
    assert_eq!((s.max_render_width, s.max_render_height), (1920, 1080));
    assert_eq!(s.macro_block_size, 8);
    s.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let s: RenderSettings = serde_json::from_value(json!({
        "text_color": [1.0, 0.0, 0.0],
        "size_preset": "4k (3840x2160)",
        "apply_highlight_color_to": ["actor"],
    }))
    .unwrap();
    assert_eq!(s.text_color.to_hex(), "#ff0000");
    assert_eq!(s.size_preset, SizePreset::FourK);
    assert!(s.apply_highlight_color_to_actor());
    assert!(!s.apply_highlight_color_to_recipient());
    assert_eq!(s.roi_padding, 100);

    assert!(serde_json::from_value::<RenderSettings>(json!({"size_preset": "8k"})).is_err());
    assert!(serde_json::from_value::<RenderSettings>(json!({"bogus": 1})).is_err());
}

#[test]
fn config_excludes_available_lists() {
    let mut s = RenderSettings::default();
    s.set_available_keypoints(vec![0, 1, 2]);
    let cfg = s.config().unwrap();
    let map = cfg.as_object().unwrap();
    assert!(!map.contains_key("available_keypoints"));
    assert!(!map.contains_key("available_segments"));
    assert_eq!(map["keypoints"], json!([0, 1, 2]));
    assert_eq!(map["text_color"], json!("#000000"));
}

#[test]
fn presets_and_max_size_stay_in_sync() {
    let mut s = RenderSettings::default();
    s.set_size_preset(SizePreset::TwoPointSevenK);
    assert_eq!((s.max_render_width, s.max_render_height), (2704, 1520));
    s.set_max_render_size(1000, 700);
    assert_eq!(s.size_preset, SizePreset::Customize);
    s.set_size_preset(SizePreset::Customize);
    assert_eq!((s.max_render_width, s.max_render_height), (1000, 700));
    s.set_max_render_size(1280, 720);
    assert_eq!(s.size_preset, SizePreset::Hd);
}

#[test]
fn keypoint_reconciliation() {
    let mut s = RenderSettings::default();
    s.set_available_keypoints(vec![0, 1, 2, 3]);
    assert_eq!(s.keypoints, vec![0, 1, 2, 3]);
    assert_eq!(s.available_segments.len(), 6);
    assert_eq!(s.segments, vec![[0, 1], [1, 2], [2, 3]]);

    s.segments = vec![[0, 3]];
    s.set_keypoints(vec![0, 3]);
    assert_eq!(s.segments, vec![[0, 3]]);

    s.set_available_keypoints(vec![3, 4]);
    assert_eq!(s.keypoints, vec![3]);
    assert!(s.segments.is_empty());
    assert!(s.available_segments.is_empty());

    s.set_available_keypoints(vec![7, 8]);
    assert_eq!(s.keypoints, vec![7, 8]);
    assert_eq!(s.segments, vec![[7, 8]]);
    s.validate().unwrap();
}

#[test]
fn validation_rules() {
    let mut s = RenderSettings::default();
    s.max_render_width = 200;
    assert!(matches!(s.validate(), Err(ClipError::Configuration(_))));

    let mut s = RenderSettings::default();
    s.macro_block_size = 0;
    assert!(s.validate().is_err());

    let mut s = RenderSettings::default();
    s.macro_block_size = 512;
    s.max_render_height = 300;
    assert!(s.validate().is_err());

    let mut s = RenderSettings::default();
    s.available_keypoints = vec![0, 1];
    s.keypoints = vec![2];
    assert!(s.validate().is_err());

    let mut s = RenderSettings::default();
    s.keypoints = vec![0, 1];
    s.segments = vec![[0, 5]];
    assert!(s.validate().is_err());
}

#[test]
fn highlight_helpers() {
    let mut s = RenderSettings::default();
    s.override_highlight_color
        .insert("attack".to_owned(), Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(s.highlight_color_for("attack"), Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(s.highlight_color_for("sniff"), s.highlight_color);

    assert_eq!(s.roi_padding(), 100);
    s.crop_roi = false;
    assert_eq!(s.roi_padding(), 0);
}

#[test]
fn reset_keeps_keypoint_selection() {
    let mut s = RenderSettings::default();
    s.set_available_keypoints(vec![0, 1]);
    s.text_color = Color::rgb(1.0, 0.0, 0.0);
    s.interval_padding = 3.0;
    s.reset();
    assert_eq!(s.text_color, Color::BLACK);
    assert_eq!(s.interval_padding, 1.0);
    assert_eq!(s.keypoints, vec![0, 1]);
    assert_eq!(s.segments, vec![[0, 1]]);
}
