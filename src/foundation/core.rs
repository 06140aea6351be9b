use crate::foundation::error::{ClipError, ClipResult};

pub use kurbo::Point;

/// Half-open frame interval `[start, stop)` in global stream space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameInterval {
    /// Inclusive first frame.
    pub start: u64,
    /// Exclusive end frame.
    pub stop: u64,
}

impl FrameInterval {
    /// Create a validated interval with `start <= stop`.
    pub fn new(start: u64, stop: u64) -> ClipResult<Self> {
        if start > stop {
            return Err(ClipError::validation(format!(
                "frame interval start ({start}) must be <= stop ({stop})"
            )));
        }
        Ok(Self { start, stop })
    }

    /// Number of frames covered by the interval.
    pub fn len_frames(self) -> u64 {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.start == self.stop
    }

    /// Return `true` when `frame` is inside `[start, stop)`.
    pub fn contains(self, frame: u64) -> bool {
        self.start <= frame && frame < self.stop
    }
}

/// Pixel dimensions of a frame or raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of_image<P: image::Pixel>(img: &image::ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decoded video frame, tightly packed RGB8.
pub type Frame = image::RgbImage;
