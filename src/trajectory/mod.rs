//! Trajectory collaborator contract.
//!
//! The snippet pipeline only needs two things from tracking data: the time range an
//! individual is tracked over, and the poses inside an inclusive frame window.

pub mod features;
pub mod pose;

use crate::foundation::core::Point;

pub use features::{keypoints, posture_segments, trajectory_range};
pub use pose::PoseTrajectory;

/// Active trajectories keyed by individual identifier.
pub type TrajectoryMap = std::collections::BTreeMap<String, std::sync::Arc<dyn Trajectory>>;

/// Failures signaled by a trajectory or a pose feature.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// The queried window lies outside the trajectory's valid range.
    #[error("window [{start}, {stop}] is outside the trajectory interval")]
    OutOfInterval { start: u64, stop: u64 },

    /// A requested keypoint index does not exist in the trajectory.
    #[error("keypoint index {index} out of range for {count} keypoints")]
    KeypointIndex { index: usize, count: usize },

    #[error("malformed trajectory: {0}")]
    Malformed(String),
}

/// Poses of one individual inside a frame window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseWindow {
    pub timestamps: Vec<u64>,
    /// One keypoint list per timestamp. Missing detections are non-finite.
    pub poses: Vec<Vec<Point>>,
}

impl PoseWindow {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Time-indexed keypoint data of one tracked individual.
pub trait Trajectory: Send + Sync {
    /// First and last tracked frame (inclusive), or `None` when empty.
    fn time_range(&self) -> Option<(u64, u64)>;

    /// Poses with `start <= t <= stop`.
    ///
    /// Fails with [`TrajectoryError::OutOfInterval`] when the window does not overlap
    /// [`time_range`](Self::time_range).
    fn slice_window(&self, start: u64, stop: u64) -> Result<PoseWindow, TrajectoryError>;
}

impl<T: Trajectory + ?Sized> Trajectory for std::sync::Arc<T> {
    fn time_range(&self) -> Option<(u64, u64)> {
        (**self).time_range()
    }

    fn slice_window(&self, start: u64, stop: u64) -> Result<PoseWindow, TrajectoryError> {
        (**self).slice_window(start, stop)
    }
}

impl<T: Trajectory + ?Sized> Trajectory for Box<T> {
    fn time_range(&self) -> Option<(u64, u64)> {
        (**self).time_range()
    }

    fn slice_window(&self, start: u64, stop: u64) -> Result<PoseWindow, TrajectoryError> {
        (**self).slice_window(start, stop)
    }
}
