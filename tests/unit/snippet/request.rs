use super::*;
use crate::foundation::color::Color;
use crate::snippet::observation::Observation;

fn plan() -> SnippetPlan {
    SnippetPlan {
        interval: FrameInterval::new(30, 55).unwrap(),
        roi: None,
    }
}

fn request() -> SnippetRequest {
    SnippetRequest::new(vec!["/data/cage1_a.mp4".into(), "/data/cage1_b.mp4".into()], 40, 45)
        .with_observations(ObservationData::new(vec![
            Observation::new("approach", "m1", 40, 45).with_recipient("m2"),
        ]))
        .with_output_dir("/tmp/snippets")
}

#[test]
fn output_path_shape() {
    let path = request().output_path(&plan()).unwrap();
    let file = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(path.starts_with("/tmp/snippets"));
    assert!(file.starts_with("cage1_a_"));
    assert!(file.ends_with(".mp4"));
    assert_eq!(file.len(), "cage1_a_".len() + 64 + ".mp4".len());
}

#[test]
fn identical_content_identical_path() {
    let a = request();
    let mut settings = RenderSettings::default();
    settings.text_color = Color::from_hex("#000000").unwrap();
    let b = request().with_settings(Arc::new(settings));
    assert_eq!(a.output_path(&plan()).unwrap(), b.output_path(&plan()).unwrap());
}

#[test]
fn any_change_changes_path() {
    let base = request().output_path(&plan()).unwrap();

    let mut settings = RenderSettings::default();
    settings.text_color = Color::rgb(1.0, 0.0, 0.0);
    let recolored = request().with_settings(Arc::new(settings));
    assert_ne!(base, recolored.output_path(&plan()).unwrap());

    let other_plan = SnippetPlan {
        roi: Some(Roi {
            x0: 0,
            y0: 0,
            x1: 9,
            y1: 9,
        }),
        ..plan()
    };
    assert_ne!(base, request().output_path(&other_plan).unwrap());

    let highlighted = request().with_observations(request().observation_data.with_highlight([0]));
    assert_ne!(base, highlighted.output_path(&plan()).unwrap());
}

#[test]
fn available_keypoints_do_not_affect_the_key() {
    let mut settings = RenderSettings::default();
    settings.available_keypoints = vec![0, 1, 2, 3];
    let a = request().with_settings(Arc::new(settings));
    assert_eq!(
        a.output_path(&plan()).unwrap(),
        request().output_path(&plan()).unwrap()
    );
}

#[test]
fn empty_video_list_is_a_configuration_error() {
    let r = SnippetRequest::new(Vec::new(), 0, 1);
    assert!(matches!(
        r.output_path(&plan()),
        Err(ClipError::Configuration(_))
    ));
}
