use super::*;
use serde_json::json;

fn walk(frames: std::ops::Range<u64>) -> PoseTrajectory {
    let timestamps: Vec<u64> = frames.collect();
    let poses = timestamps
        .iter()
        .map(|&t| vec![Point::new(t as f64, 1.0), Point::new(t as f64 + 2.0, 3.0)])
        .collect();
    PoseTrajectory::new(timestamps, poses).unwrap()
}

#[test]
fn slice_window_is_inclusive() {
    let t = walk(10..20);
    let w = t.slice_window(12, 14).unwrap();
    assert_eq!(w.timestamps, vec![12, 13, 14]);
    assert_eq!(w.poses[0][0], Point::new(12.0, 1.0));

    let single = t.slice_window(19, 19).unwrap();
    assert_eq!(single.len(), 1);
}

#[test]
fn slice_window_clips_to_range_and_reports_out_of_interval() {
    let t = walk(10..20);
    assert_eq!(t.slice_window(0, 11).unwrap().timestamps, vec![10, 11]);
    assert_eq!(
        t.slice_window(20, 30),
        Err(TrajectoryError::OutOfInterval { start: 20, stop: 30 })
    );
    assert!(matches!(
        t.slice_window(0, 9),
        Err(TrajectoryError::OutOfInterval { .. })
    ));
}

#[test]
fn gaps_yield_empty_windows() {
    let t = PoseTrajectory::new(
        vec![0, 10],
        vec![vec![Point::new(0.0, 0.0)], vec![Point::new(1.0, 1.0)]],
    )
    .unwrap();
    assert!(t.slice_window(3, 5).unwrap().is_empty());
}

#[test]
fn rejects_malformed_input() {
    assert!(PoseTrajectory::new(vec![1, 1], vec![vec![], vec![]]).is_err());
    assert!(PoseTrajectory::new(vec![1], vec![]).is_err());
    assert!(
        PoseTrajectory::new(
            vec![1, 2],
            vec![vec![Point::ZERO], vec![Point::ZERO, Point::ZERO]]
        )
        .is_err()
    );
}

#[test]
fn json_with_missing_detections() {
    let t: PoseTrajectory = serde_json::from_value(json!({
        "timestamps": [5, 6],
        "keypoints": [[[1.0, 2.0], null], [[3.0, 4.0], [5.0, 6.0]]]
    }))
    .unwrap();
    assert_eq!(t.keypoint_count(), 2);
    assert_eq!(t.time_range(), Some((5, 6)));
    let w = t.slice_window(5, 5).unwrap();
    assert!(w.poses[0][1].x.is_nan());

    let back = serde_json::to_value(&t).unwrap();
    assert_eq!(back["keypoints"][0][1], json!(null));

    assert!(
        serde_json::from_value::<PoseTrajectory>(json!({
            "timestamps": [2, 1],
            "keypoints": [[], []]
        }))
        .is_err()
    );
}
