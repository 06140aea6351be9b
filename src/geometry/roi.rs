use kurbo::Rect;

use crate::foundation::core::{FrameInterval, FrameSize};
use crate::foundation::error::{ClipError, ClipResult};
use crate::trajectory::{TrajectoryError, TrajectoryMap, trajectory_range};

/// Integer pixel region with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Roi {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Roi {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width(), self.height())
    }

    pub fn fits_within(&self, size: FrameSize) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1 && self.x1 < size.width && self.y1 < size.height
    }
}

/// Union bounding box of `individuals` over `interval`, in original-frame pixels.
///
/// Each trajectory is sliced to the inclusive window `[interval.start, interval.stop]`
/// intersected with its own time range. Individuals without a trajectory or without finite
/// data in the window are skipped. The result has non-negative mins and rounded coordinates.
pub fn compute_roi<'a>(
    trajectories: &TrajectoryMap,
    individuals: impl IntoIterator<Item = &'a str>,
    interval: FrameInterval,
) -> Option<Rect> {
    let mut union: Option<Rect> = None;
    for individual in individuals {
        let Some(trajectory) = trajectories.get(individual) else {
            tracing::debug!(individual, "no trajectory for individual");
            continue;
        };
        let Some((first, last)) = trajectory.time_range() else {
            continue;
        };
        let start = interval.start.max(first);
        let stop = interval.stop.min(last);
        if start > stop {
            continue;
        }
        let window = match trajectory.slice_window(start, stop) {
            Ok(window) => window,
            Err(TrajectoryError::OutOfInterval { .. }) => continue,
            Err(e) => {
                tracing::warn!(individual, error = %e, "skipping trajectory in roi");
                continue;
            }
        };
        let Some(range) = trajectory_range(&window) else {
            continue;
        };
        union = Some(union.map_or(range, |u| u.union(range)));
    }

    let r = union?;
    Some(Rect::new(
        r.x0.max(0.0).round(),
        r.y0.max(0.0).round(),
        r.x1.round(),
        r.y1.round(),
    ))
}

/// Expand `roi` by `padding` pixels, clamped to `[0, width-1] x [0, height-1]`.
///
/// Fails with `InvalidRoi` when `roi` has non-integral or non-finite coordinates, or when
/// nothing of it remains inside the frame.
pub fn padded_roi(roi: Rect, padding: u32, frame: FrameSize) -> ClipResult<Roi> {
    let coords = [roi.x0, roi.y0, roi.x1, roi.y1];
    if coords.iter().any(|v| !v.is_finite() || v.fract() != 0.0) {
        return Err(ClipError::invalid_roi(format!(
            "roi has non-integer values: {coords:?}"
        )));
    }
    if frame.is_empty() {
        return Err(ClipError::invalid_roi(format!("frame size {frame} is empty")));
    }
    let pad = f64::from(padding);
    let max_x = f64::from(frame.width - 1);
    let max_y = f64::from(frame.height - 1);
    let x0 = (roi.x0 - pad).max(0.0);
    let y0 = (roi.y0 - pad).max(0.0);
    let x1 = (roi.x1 + pad).min(max_x);
    let y1 = (roi.y1 + pad).min(max_y);
    if x0 > x1 || y0 > y1 {
        return Err(ClipError::invalid_roi(format!(
            "padded roi ({x0}, {y0}, {x1}, {y1}) lies outside the {frame} frame"
        )));
    }
    Ok(Roi {
        x0: x0 as u32,
        y0: y0 as u32,
        x1: x1 as u32,
        y1: y1 as u32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/roi.rs"]
mod tests;
