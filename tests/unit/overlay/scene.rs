use std::sync::Arc;

use super::*;
use crate::foundation::core::FrameSize;
use crate::settings::HighlightTarget;
use crate::snippet::observation::Observation;
use crate::trajectory::{PoseTrajectory, Trajectory};

fn still(frames: std::ops::Range<u64>, points: &[(f64, f64)]) -> Arc<dyn Trajectory> {
    let timestamps: Vec<u64> = frames.collect();
    let pose: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    Arc::new(PoseTrajectory::new(timestamps.clone(), vec![pose; timestamps.len()]).unwrap())
}

fn trajectories() -> TrajectoryMap {
    let mut m = TrajectoryMap::new();
    m.insert("m1".into(), still(0..100, &[(10.0, 10.0), (20.0, 30.0), (f64::NAN, 0.0)]));
    m.insert("m2".into(), still(0..100, &[(50.0, 50.0), (60.0, 60.0), (70.0, 70.0)]));
    m.insert("m3".into(), still(0..100, &[(5.0, 5.0), (6.0, 6.0), (7.0, 7.0)]));
    m.insert("gone".into(), still(0..10, &[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]));
    m
}

fn data() -> ObservationData {
    ObservationData::new(vec![
        Observation::new("approach", "m1", 40, 45).with_recipient("m2"),
        Observation::new("sniff", "m2", 44, 50),
    ])
}

fn settings() -> RenderSettings {
    let mut s = RenderSettings::default();
    s.set_available_keypoints(vec![0, 1, 2]);
    s
}

fn crop() -> CropFrame {
    CropFrame::new(None, FrameSize::new(100, 100))
}

#[test]
fn labels_follow_observation_spans() {
    let scene = build_scene(44, &data(), &trajectories(), &settings(), &crop()).unwrap();
    let texts: Vec<&str> = scene.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["approach", "sniff"]);

    let scene = build_scene(46, &data(), &trajectories(), &settings(), &crop()).unwrap();
    assert_eq!(scene.labels.len(), 1);
    assert_eq!(scene.labels[0].text, "sniff");
    assert_eq!(scene.labels[0].text_color, Color::BLACK);
    assert!(!scene.labels[0].highlighted);
}

#[test]
fn skeleton_roles_colors_and_order() {
    let s = settings();
    let scene = build_scene(42, &data(), &trajectories(), &s, &crop()).unwrap();
    let order: Vec<(&str, Role)> = scene
        .skeletons
        .iter()
        .map(|k| (k.individual.as_str(), k.role))
        .collect();
    assert_eq!(
        order,
        vec![("m3", Role::Other), ("m2", Role::Recipient), ("m1", Role::Actor)]
    );
    assert_eq!(scene.skeletons[2].color, s.actor_color);
    assert_eq!(scene.skeletons[1].color, s.recipient_color);
    assert_eq!(scene.skeletons[0].color, s.other_color);
}

#[test]
fn coordinates_are_normalized_and_flipped() {
    let scene = build_scene(42, &data(), &trajectories(), &settings(), &crop()).unwrap();
    let m1 = scene.skeletons.iter().find(|k| k.individual == "m1").unwrap();
    // NaN keypoint dropped, as is every segment touching it.
    assert_eq!(m1.keypoints.len(), 2);
    assert!((m1.keypoints[0].x - 0.1).abs() < 1e-12);
    assert!((m1.keypoints[0].y - 0.9).abs() < 1e-12);
    assert_eq!(m1.segments.len(), 1);
}

#[test]
fn highlight_recolors_label_and_configured_roles() {
    let mut s = settings();
    s.apply_highlight_color_to = vec![HighlightTarget::Actor];
    s.override_highlight_color
        .insert("approach".into(), Color::rgb(0.0, 0.0, 1.0));
    let data = data().with_highlight([0]);

    let scene = build_scene(42, &data, &trajectories(), &s, &crop()).unwrap();
    let label = &scene.labels[0];
    assert!(label.highlighted);
    assert_eq!(label.text_color, Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(label.edge_color, Color::rgb(0.0, 0.0, 1.0));
    assert!((label.fill_color.a - 0.5).abs() < 1e-12);

    let color_of = |name: &str| {
        scene
            .skeletons
            .iter()
            .find(|k| k.individual == name)
            .unwrap()
            .color
    };
    assert_eq!(color_of("m1"), Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(color_of("m2"), s.recipient_color);

    s.highlight = false;
    let scene = build_scene(42, &data, &trajectories(), &s, &crop()).unwrap();
    assert!(!scene.labels[0].highlighted);
}

#[test]
fn highlight_color_persists_without_labels() {
    let mut s = settings();
    s.draw_label = false;
    s.apply_highlight_color_to = vec![HighlightTarget::Recipient];
    let data = data().with_highlight([0]);
    let scene = build_scene(42, &data, &trajectories(), &s, &crop()).unwrap();
    assert!(scene.labels.is_empty());
    let m2 = scene.skeletons.iter().find(|k| k.individual == "m2").unwrap();
    assert_eq!(m2.color, s.highlight_color);
}

#[test]
fn invalid_keypoint_selection_is_a_feature_error() {
    let mut s = RenderSettings::default();
    s.keypoints = vec![0, 9];
    let err = build_scene(42, &data(), &trajectories(), &s, &crop()).unwrap_err();
    assert!(matches!(err, ClipError::Feature(_)));
}

#[test]
fn drawing_switches() {
    let mut s = settings();
    s.draw_trajectories = false;
    s.draw_label = false;
    let scene = build_scene(42, &data(), &trajectories(), &s, &crop()).unwrap();
    assert!(scene.is_empty());
}
