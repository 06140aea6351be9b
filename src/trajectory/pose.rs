use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;
use crate::trajectory::{PoseWindow, Trajectory, TrajectoryError};

/// Reference [`Trajectory`]: strictly increasing timestamps, one keypoint list per timestamp.
///
/// JSON form: `{"timestamps": [..], "keypoints": [[[x, y] | null, ..], ..]}`. A `null`
/// keypoint is a missing detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PoseTrajectoryRepr", into = "PoseTrajectoryRepr")]
pub struct PoseTrajectory {
    timestamps: Vec<u64>,
    poses: Vec<Vec<Point>>,
}

#[derive(Serialize, Deserialize)]
struct PoseTrajectoryRepr {
    timestamps: Vec<u64>,
    keypoints: Vec<Vec<Option<[f64; 2]>>>,
}

impl TryFrom<PoseTrajectoryRepr> for PoseTrajectory {
    type Error = TrajectoryError;

    fn try_from(repr: PoseTrajectoryRepr) -> Result<Self, Self::Error> {
        let poses = repr
            .keypoints
            .into_iter()
            .map(|pose| {
                pose.into_iter()
                    .map(|kp| match kp {
                        Some([x, y]) => Point::new(x, y),
                        None => Point::new(f64::NAN, f64::NAN),
                    })
                    .collect()
            })
            .collect();
        Self::new(repr.timestamps, poses)
    }
}

impl From<PoseTrajectory> for PoseTrajectoryRepr {
    fn from(t: PoseTrajectory) -> Self {
        Self {
            timestamps: t.timestamps,
            keypoints: t
                .poses
                .into_iter()
                .map(|pose| {
                    pose.into_iter()
                        .map(|p| (p.x.is_finite() && p.y.is_finite()).then_some([p.x, p.y]))
                        .collect()
                })
                .collect(),
        }
    }
}

impl PoseTrajectory {
    pub fn new(timestamps: Vec<u64>, poses: Vec<Vec<Point>>) -> Result<Self, TrajectoryError> {
        if timestamps.len() != poses.len() {
            return Err(TrajectoryError::Malformed(format!(
                "{} timestamps but {} poses",
                timestamps.len(),
                poses.len()
            )));
        }
        if timestamps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TrajectoryError::Malformed(
                "timestamps must be strictly increasing".to_owned(),
            ));
        }
        if let Some(first) = poses.first()
            && poses.iter().any(|p| p.len() != first.len())
        {
            return Err(TrajectoryError::Malformed(
                "every pose must have the same number of keypoints".to_owned(),
            ));
        }
        Ok(Self { timestamps, poses })
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn keypoint_count(&self) -> usize {
        self.poses.first().map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl Trajectory for PoseTrajectory {
    fn time_range(&self) -> Option<(u64, u64)> {
        Some((*self.timestamps.first()?, *self.timestamps.last()?))
    }

    fn slice_window(&self, start: u64, stop: u64) -> Result<PoseWindow, TrajectoryError> {
        let out_of_interval = TrajectoryError::OutOfInterval { start, stop };
        let (first, last) = self.time_range().ok_or(out_of_interval.clone())?;
        if start > stop || stop < first || start > last {
            return Err(out_of_interval);
        }
        let lo = self.timestamps.partition_point(|&t| t < start);
        let hi = self.timestamps.partition_point(|&t| t <= stop);
        Ok(PoseWindow {
            timestamps: self.timestamps[lo..hi].to_vec(),
            poses: self.poses[lo..hi].to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/pose.rs"]
mod tests;
