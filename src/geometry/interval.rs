use crate::foundation::core::FrameInterval;
use crate::foundation::error::{ClipError, ClipResult};

/// Expand `[start, stop)` by `padding_seconds` on both sides, clamped to `[0, total_frames]`.
pub fn padded_interval(
    start: u64,
    stop: u64,
    padding_seconds: f64,
    fps: f64,
    total_frames: u64,
) -> ClipResult<FrameInterval> {
    if start > stop {
        return Err(ClipError::validation(format!(
            "snippet start ({start}) must be <= stop ({stop})"
        )));
    }
    let pad = padding_seconds * fps;
    if !pad.is_finite() || pad < 0.0 {
        return Err(ClipError::validation(format!(
            "interval padding of {padding_seconds} s at {fps} fps is not a valid frame count"
        )));
    }
    let padded_start = (start as f64 - pad).max(0.0).floor() as u64;
    let padded_stop = (stop as f64 + pad).min(total_frames as f64).floor() as u64;
    FrameInterval::new(padded_start.min(padded_stop), padded_stop)
}
