use crate::foundation::core::{FrameSize, Point};
use crate::geometry::roi::Roi;

/// Canvas resolution for a 1080 px tall render.
pub const BASE_DPI: f64 = 300.0;
const BASE_HEIGHT: f64 = 1080.0;
const POINTS_PER_INCH: f64 = 72.0;

/// Device-independent drawing surface covering one scaled frame.
///
/// Sizes are specified in points; the canvas dpi scales with the render height so a size
/// maps to the same share of the frame at every output resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayCanvas {
    original: FrameSize,
    crop: FrameSize,
    render: FrameSize,
}

impl OverlayCanvas {
    /// `crop` defaults to the original frame size when no ROI is applied.
    pub fn new(original: FrameSize, render: FrameSize, crop: Option<FrameSize>) -> Self {
        Self {
            original,
            crop: crop.unwrap_or(original),
            render,
        }
    }

    pub fn render_size(&self) -> FrameSize {
        self.render
    }

    pub fn dpi(&self) -> f64 {
        f64::from(self.render.height) * BASE_DPI / BASE_HEIGHT
    }

    /// Render/crop scale factor (uniform, the smaller axis ratio).
    pub fn scale(&self) -> f64 {
        ratio_min(self.render, self.crop)
    }

    /// Original/crop factor (uniform, the smaller axis ratio).
    pub fn crop_scale(&self) -> f64 {
        ratio_min(self.original, self.crop)
    }

    /// Points that cover `num_pixels` output-video pixels, consistent across crops and scales.
    pub fn get_pixel_size(&self, num_pixels: f64) -> f64 {
        let original_h = f64::from(self.original.height.max(1));
        (num_pixels * self.crop_scale() / original_h)
            * f64::from(self.crop.height)
            * self.scale()
            * POINTS_PER_INCH
            / self.dpi()
    }

    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi() / POINTS_PER_INCH
    }

    /// Map axes-fraction coordinates (origin bottom-left) to canvas pixels (origin top-left).
    pub fn axes_to_canvas(&self, p: Point) -> Point {
        Point::new(
            p.x * f64::from(self.render.width),
            (1.0 - p.y) * f64::from(self.render.height),
        )
    }
}

fn ratio_min(num: FrameSize, den: FrameSize) -> f64 {
    let w = f64::from(num.width) / f64::from(den.width.max(1));
    let h = f64::from(num.height) / f64::from(den.height.max(1));
    w.min(h)
}

/// Maps original-frame pixel coordinates into axes fractions of the cropped frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropFrame {
    origin: Point,
    width: f64,
    height: f64,
}

impl CropFrame {
    pub fn new(roi: Option<Roi>, original: FrameSize) -> Self {
        match roi {
            Some(roi) => Self {
                origin: Point::new(f64::from(roi.x0), f64::from(roi.y0)),
                width: f64::from(roi.width()),
                height: f64::from(roi.height()),
            },
            None => Self {
                origin: Point::ZERO,
                width: f64::from(original.width.max(1)),
                height: f64::from(original.height.max(1)),
            },
        }
    }

    /// Shift by the crop origin, normalize by the crop size and flip the vertical axis.
    pub fn to_axes(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.origin.x) / self.width,
            1.0 - (p.y - self.origin.y) / self.height,
        )
    }
}
