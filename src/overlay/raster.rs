use vello_cpu::kurbo::{Affine, BezPath, Circle, RoundedRect, Shape, Stroke};

use crate::foundation::color::Color;
use crate::foundation::core::{FrameSize, Point};
use crate::foundation::error::{ClipError, ClipResult};
use crate::overlay::canvas::OverlayCanvas;
use crate::overlay::scene::{LabelItem, OverlayScene, SkeletonItem};
use crate::overlay::text::{LabelBrush, LabelTextEngine};

/// Label font size in points.
pub const LABEL_FONT_POINTS: f64 = 12.0;
/// Label anchor (box center) in axes fractions.
pub const LABEL_ANCHOR: (f64, f64) = (0.5, 0.1);
/// Label box padding and corner radius, in ems.
pub const LABEL_PAD_EM: f64 = 0.3;
/// Label box edge width in points when highlighted.
pub const LABEL_EDGE_POINTS: f64 = 1.0;

const TOLERANCE: f64 = 0.1;

/// Overlay sizes resolved to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeMetrics {
    pub segment_width_px: f64,
    pub marker_radius_px: f64,
}

impl StrokeMetrics {
    /// Segments are half the overlay size wide; markers are overlay size across.
    pub fn new(canvas: &OverlayCanvas, overlay_size: f64) -> Self {
        Self {
            segment_width_px: canvas.points_to_px(canvas.get_pixel_size(overlay_size / 2.0)),
            marker_radius_px: canvas.points_to_px(canvas.get_pixel_size(overlay_size)) / 2.0,
        }
    }
}

/// Draw `scene` into a fresh transparent premultiplied RGBA8 pixmap of the canvas size.
pub fn rasterize(
    scene: &OverlayScene,
    canvas: &OverlayCanvas,
    metrics: StrokeMetrics,
    text: Option<&mut LabelTextEngine>,
) -> ClipResult<vello_cpu::Pixmap> {
    let size = canvas.render_size();
    let (width, height) = surface_dims(size)?;
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    if scene.is_empty() {
        return Ok(pixmap);
    }

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(Affine::IDENTITY);
    for skeleton in &scene.skeletons {
        draw_skeleton(&mut ctx, canvas, metrics, skeleton);
    }
    if let Some(engine) = text {
        for label in &scene.labels {
            draw_label(&mut ctx, canvas, engine, label)?;
        }
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    if (u32::from(pixmap.width()), u32::from(pixmap.height())) != (size.width, size.height) {
        return Err(ClipError::size_mismatch(format!(
            "overlay rendered at {}x{}, expected {size}",
            pixmap.width(),
            pixmap.height()
        )));
    }
    Ok(pixmap)
}

fn surface_dims(size: FrameSize) -> ClipResult<(u16, u16)> {
    let width = u16::try_from(size.width)
        .map_err(|_| ClipError::validation(format!("overlay width {} exceeds u16", size.width)))?;
    let height = u16::try_from(size.height).map_err(|_| {
        ClipError::validation(format!("overlay height {} exceeds u16", size.height))
    })?;
    if width == 0 || height == 0 {
        return Err(ClipError::validation("overlay size must be non-zero"));
    }
    Ok((width, height))
}

fn paint(color: Color) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = color.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn draw_skeleton(
    ctx: &mut vello_cpu::RenderContext,
    canvas: &OverlayCanvas,
    metrics: StrokeMetrics,
    skeleton: &SkeletonItem,
) {
    ctx.set_paint(paint(skeleton.color));

    if metrics.segment_width_px > 0.0 && !skeleton.segments.is_empty() {
        let mut path = BezPath::new();
        for (a, b) in &skeleton.segments {
            path.move_to(point_to_cpu(canvas.axes_to_canvas(*a)));
            path.line_to(point_to_cpu(canvas.axes_to_canvas(*b)));
        }
        ctx.set_stroke(Stroke::new(metrics.segment_width_px));
        ctx.stroke_path(&path);
    }

    if metrics.marker_radius_px > 0.0 {
        for p in &skeleton.keypoints {
            let center = point_to_cpu(canvas.axes_to_canvas(*p));
            let marker = Circle::new(center, metrics.marker_radius_px).to_path(TOLERANCE);
            ctx.fill_path(&marker);
        }
    }
}

fn draw_label(
    ctx: &mut vello_cpu::RenderContext,
    canvas: &OverlayCanvas,
    engine: &mut LabelTextEngine,
    label: &LabelItem,
) -> ClipResult<()> {
    let font_px = canvas.points_to_px(LABEL_FONT_POINTS);
    let layout = engine.layout(&label.text, font_px as f32, LabelBrush::from(label.text_color))?;
    let w = f64::from(layout.width());
    let h = f64::from(layout.height());
    let anchor = canvas.axes_to_canvas(Point::new(LABEL_ANCHOR.0, LABEL_ANCHOR.1));
    let pad = LABEL_PAD_EM * font_px;

    let bbox = RoundedRect::new(
        anchor.x - w / 2.0 - pad,
        anchor.y - h / 2.0 - pad,
        anchor.x + w / 2.0 + pad,
        anchor.y + h / 2.0 + pad,
        pad,
    )
    .to_path(TOLERANCE);

    ctx.set_transform(Affine::IDENTITY);
    ctx.set_paint(paint(label.fill_color));
    ctx.fill_path(&bbox);
    if label.highlighted {
        ctx.set_paint(paint(label.edge_color));
        ctx.set_stroke(Stroke::new(canvas.points_to_px(LABEL_EDGE_POINTS)));
        ctx.stroke_path(&bbox);
    }

    ctx.set_transform(Affine::translate((anchor.x - w / 2.0, anchor.y - h / 2.0)));
    let font = engine.font().clone();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(Affine::IDENTITY);
    Ok(())
}
