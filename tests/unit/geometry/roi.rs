use std::sync::Arc;

use super::*;
use crate::foundation::core::Point;
use crate::trajectory::{PoseTrajectory, Trajectory};

fn still(frames: std::ops::Range<u64>, points: &[(f64, f64)]) -> Arc<dyn Trajectory> {
    let timestamps: Vec<u64> = frames.collect();
    let pose: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    let poses = vec![pose; timestamps.len()];
    Arc::new(PoseTrajectory::new(timestamps, poses).unwrap())
}

fn map() -> TrajectoryMap {
    let mut m = TrajectoryMap::new();
    m.insert("a".into(), still(0..50, &[(10.4, 20.0), (30.0, 40.6)]));
    m.insert("b".into(), still(40..80, &[(-5.0, 100.0), (60.0, 110.0)]));
    m.insert("late".into(), still(200..210, &[(500.0, 500.0)]));
    m
}

fn iv(start: u64, stop: u64) -> FrameInterval {
    FrameInterval::new(start, stop).unwrap()
}

#[test]
fn union_over_individuals_in_window() {
    let roi = compute_roi(&map(), ["a", "b"], iv(30, 55)).unwrap();
    assert_eq!(roi, Rect::new(0.0, 20.0, 60.0, 110.0));
}

#[test]
fn skips_individuals_without_data() {
    let roi = compute_roi(&map(), ["a", "late", "ghost"], iv(0, 10)).unwrap();
    assert_eq!(roi, Rect::new(10.0, 20.0, 30.0, 41.0));
    assert!(compute_roi(&map(), ["late"], iv(0, 100)).is_none());
    assert!(compute_roi(&map(), [], iv(0, 100)).is_none());
}

#[test]
fn padding_clamps_to_frame() {
    let frame = FrameSize::new(64, 48);
    let roi = padded_roi(Rect::new(10.0, 5.0, 30.0, 40.0), 8, frame).unwrap();
    assert_eq!(
        roi,
        Roi {
            x0: 2,
            y0: 0,
            x1: 38,
            y1: 47
        }
    );
    assert_eq!(roi.size(), FrameSize::new(37, 48));
    assert!(roi.fits_within(frame));
}

#[test]
fn non_integer_or_outside_rois_are_invalid() {
    let frame = FrameSize::new(64, 48);
    assert!(matches!(
        padded_roi(Rect::new(0.5, 0.0, 10.0, 10.0), 0, frame),
        Err(ClipError::InvalidRoi(_))
    ));
    assert!(matches!(
        padded_roi(Rect::new(100.0, 0.0, 120.0, 10.0), 0, frame),
        Err(ClipError::InvalidRoi(_))
    ));
}
