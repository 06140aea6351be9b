use kurbo::Rect;

use crate::foundation::core::Point;
use crate::trajectory::{PoseWindow, TrajectoryError};

fn check_index(index: usize, count: usize) -> Result<(), TrajectoryError> {
    if index >= count {
        return Err(TrajectoryError::KeypointIndex { index, count });
    }
    Ok(())
}

/// Selected keypoints per timestamp. An empty selection returns every keypoint.
pub fn keypoints(
    window: &PoseWindow,
    selection: &[usize],
) -> Result<Vec<Vec<Point>>, TrajectoryError> {
    window
        .poses
        .iter()
        .map(|pose| {
            if selection.is_empty() {
                return Ok(pose.clone());
            }
            selection
                .iter()
                .map(|&i| {
                    check_index(i, pose.len())?;
                    Ok(pose[i])
                })
                .collect()
        })
        .collect()
}

/// Line segments between keypoint pairs, per timestamp.
pub fn posture_segments(
    window: &PoseWindow,
    pairs: &[(usize, usize)],
) -> Result<Vec<Vec<(Point, Point)>>, TrajectoryError> {
    window
        .poses
        .iter()
        .map(|pose| {
            pairs
                .iter()
                .map(|&(a, b)| {
                    check_index(a, pose.len())?;
                    check_index(b, pose.len())?;
                    Ok((pose[a], pose[b]))
                })
                .collect()
        })
        .collect()
}

/// Bounding box of every finite keypoint in the window.
pub fn trajectory_range(window: &PoseWindow) -> Option<Rect> {
    let mut points = window
        .poses
        .iter()
        .flatten()
        .filter(|p| p.x.is_finite() && p.y.is_finite());
    let first = points.next()?;
    let init = Rect::from_points(*first, *first);
    Some(points.fold(init, |r, p| r.union_pt(*p)))
}
