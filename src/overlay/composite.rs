use crate::foundation::color::Color;
use crate::foundation::core::{Frame, FrameSize};
use crate::foundation::error::{ClipError, ClipResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Drop alpha by compositing a premultiplied pixel onto an opaque background.
pub fn flatten(px: PremulRgba8, background: [u8; 3]) -> [u8; 3] {
    let inv = 255u16 - u16::from(px[3]);
    [
        px[0].saturating_add(mul_div255_u8(u16::from(background[0]), inv)),
        px[1].saturating_add(mul_div255_u8(u16::from(background[1]), inv)),
        px[2].saturating_add(mul_div255_u8(u16::from(background[2]), inv)),
    ]
}

/// Paste a premultiplied RGBA8 overlay onto `frame` using the overlay alpha as mask, then
/// flatten any remaining transparency onto `background`.
pub fn composite_overlay(
    frame: &Frame,
    overlay_premul: &[u8],
    overlay_size: FrameSize,
    background: Color,
) -> ClipResult<Frame> {
    let frame_size = FrameSize::of_image(frame);
    if frame_size != overlay_size {
        return Err(ClipError::size_mismatch(format!(
            "frame is {frame_size}, overlay is {overlay_size}"
        )));
    }
    let expected = overlay_size.width as usize * overlay_size.height as usize * 4;
    if overlay_premul.len() != expected {
        return Err(ClipError::size_mismatch(format!(
            "overlay buffer holds {} bytes, {overlay_size} rgba8 needs {expected}",
            overlay_premul.len()
        )));
    }

    let [bg_r, bg_g, bg_b, _] = background.to_rgba8();
    let mut out = Frame::new(frame_size.width, frame_size.height);
    for ((dst, src), ov) in out
        .chunks_exact_mut(3)
        .zip(frame.as_raw().chunks_exact(3))
        .zip(overlay_premul.chunks_exact(4))
    {
        let base = [src[0], src[1], src[2], 255];
        let px = over(base, [ov[0], ov[1], ov[2], ov[3]]);
        dst.copy_from_slice(&flatten(px, [bg_r, bg_g, bg_b]));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_transparent_is_identity_and_opaque_replaces() {
        assert_eq!(over([1, 2, 3, 255], [0, 0, 0, 0]), [1, 2, 3, 255]);
        assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255]), [9, 8, 7, 255]);
    }

    #[test]
    fn over_half_alpha_blends() {
        // 50% white over black.
        assert_eq!(over([0, 0, 0, 255], [128, 128, 128, 128]), [128, 128, 128, 255]);
    }

    #[test]
    fn flatten_uses_background_for_transparency() {
        assert_eq!(flatten([0, 0, 0, 0], [10, 20, 30]), [10, 20, 30]);
        assert_eq!(flatten([1, 2, 3, 255], [10, 20, 30]), [1, 2, 3]);
    }

    #[test]
    fn composite_masks_by_overlay_alpha() {
        let frame = Frame::from_pixel(2, 1, image::Rgb([100, 100, 100]));
        let overlay = [0, 0, 0, 0, 255, 0, 0, 255];
        let out = composite_overlay(&frame, &overlay, FrameSize::new(2, 1), Color::WHITE).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn composite_rejects_size_mismatch() {
        let frame = Frame::new(2, 2);
        let overlay = [0u8; 16];
        assert!(matches!(
            composite_overlay(&frame, &overlay, FrameSize::new(4, 1), Color::WHITE),
            Err(ClipError::SizeMismatch(_))
        ));
        assert!(matches!(
            composite_overlay(&frame, &overlay[..12], FrameSize::new(2, 2), Color::WHITE),
            Err(ClipError::SizeMismatch(_))
        ));
    }
}
