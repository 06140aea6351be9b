use image::imageops::{self, FilterType};

use crate::foundation::core::{Frame, FrameSize};
use crate::foundation::error::{ClipError, ClipResult};
use crate::geometry::roi::Roi;

/// Multiple of `divisor` nearest to `number`; ties go to the smaller multiple.
pub fn closest_divisible(number: f64, divisor: u32) -> u32 {
    if divisor == 0 {
        return number.round().max(0.0) as u32;
    }
    let d = f64::from(divisor);
    let remainder = number.rem_euclid(d);
    let smaller = number - remainder;
    let greater = smaller + d;
    let nearest = if number - smaller > greater - number {
        greater
    } else {
        smaller
    };
    nearest.round().max(0.0) as u32
}

/// Largest aspect-preserving size of `crop` inside `max_width x max_height`.
///
/// With a `block_size`, each dimension is rounded to its nearest multiple but never below
/// one block.
pub fn scaled_size(
    crop: FrameSize,
    max_width: u32,
    max_height: u32,
    block_size: Option<u32>,
) -> FrameSize {
    let cw = f64::from(crop.width.max(1));
    let ch = f64::from(crop.height.max(1));
    let scale = (f64::from(max_width) / cw).min(f64::from(max_height) / ch);
    let (sw, sh) = (cw * scale, ch * scale);
    match block_size {
        Some(block) => FrameSize::new(
            closest_divisible(sw, block).max(block.max(1)),
            closest_divisible(sh, block).max(block.max(1)),
        ),
        None => FrameSize::new(
            (sw.round() as u32).max(1),
            (sh.round() as u32).max(1),
        ),
    }
}

/// Crop `frame` to `roi` (inclusive bounds, or the whole frame) and scale the crop to fit
/// `max_width x max_height`. Returns `(cropped, scaled)`.
pub fn crop_and_scale(
    frame: &Frame,
    roi: Option<Roi>,
    max_width: u32,
    max_height: u32,
    block_size: Option<u32>,
) -> ClipResult<(Frame, Frame)> {
    let cropped = match roi {
        Some(roi) => {
            if !roi.fits_within(FrameSize::of_image(frame)) {
                return Err(ClipError::invalid_roi(format!(
                    "roi {roi:?} exceeds the {}x{} frame",
                    frame.width(),
                    frame.height()
                )));
            }
            imageops::crop_imm(frame, roi.x0, roi.y0, roi.width(), roi.height()).to_image()
        }
        None => frame.clone(),
    };

    let target = scaled_size(
        FrameSize::of_image(&cropped),
        max_width,
        max_height,
        block_size,
    );
    let scaled = if FrameSize::of_image(&cropped) == target {
        cropped.clone()
    } else {
        imageops::resize(&cropped, target.width, target.height, FilterType::Triangle)
    };
    Ok((cropped, scaled))
}
