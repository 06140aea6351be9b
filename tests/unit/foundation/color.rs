use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("0000FF80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_float_arrays() {
    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75])).unwrap();
    assert_eq!(c, Color::rgb(0.25, 0.5, 0.75));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<Color>(json!([0.1, 0.2])).is_err());
    assert!(serde_json::from_value::<Color>(json!("#12345")).is_err());
}

#[test]
fn serializes_as_lowercase_hex() {
    let c = Color::from_hex("#FF6965").unwrap();
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#ff6965"));
    assert_eq!(Color::from_hex("#00000080").unwrap().to_hex(), "#00000080");
}

#[test]
fn lightness_saturates_white_and_keeps_black() {
    assert_eq!(Color::WHITE.adjust_lightness(1.5).to_rgba8(), [255, 255, 255, 255]);
    assert_eq!(Color::BLACK.adjust_lightness(1.5).to_rgba8(), [0, 0, 0, 255]);
}

#[test]
fn lightness_keeps_hue_for_saturated_red() {
    // #FC0000 has l ~= 0.494, scaled to ~0.741 at 1.5x.
    let light = Color::from_hex("#FC0000").unwrap().adjust_lightness(1.5);
    let [r, g, b, a] = light.to_rgba8();
    assert_eq!(r, 255);
    assert_eq!(g, b);
    assert!(g > 100 && g < 140, "g = {g}");
    assert_eq!(a, 255);
}
