//! Vector overlay of labels, skeletons and keypoints, aligned with a cropped and scaled frame.

pub mod canvas;
pub mod composite;
pub mod raster;
pub mod scene;
pub mod text;

use crate::foundation::core::{Frame, FrameSize};
use crate::foundation::error::{ClipError, ClipResult};
use crate::geometry::roi::Roi;
use crate::settings::RenderSettings;
use crate::snippet::observation::ObservationData;
use crate::trajectory::TrajectoryMap;

pub use canvas::{CropFrame, OverlayCanvas};
pub use scene::{OverlayScene, build_scene};
pub use text::{LabelFont, LabelTextEngine};

/// Per-render overlay state, created before the first frame and readied by it.
#[derive(Debug)]
pub struct OverlayCompositor {
    original: FrameSize,
    roi: Option<Roi>,
    font: Option<LabelFont>,
    state: CompositorState,
}

#[derive(Debug)]
enum CompositorState {
    /// Cropped/scaled sizes are only known once a frame went through crop-and-scale.
    Uninitialized,
    Ready(Ready),
}

#[derive(Debug)]
struct Ready {
    canvas: OverlayCanvas,
    crop: CropFrame,
    metrics: raster::StrokeMetrics,
    text: Option<LabelTextEngine>,
}

impl OverlayCompositor {
    pub fn new(original: FrameSize, roi: Option<Roi>, font: Option<LabelFont>) -> Self {
        Self {
            original,
            roi,
            font,
            state: CompositorState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, CompositorState::Ready(_))
    }

    /// Canvas of a readied compositor.
    pub fn canvas(&self) -> Option<&OverlayCanvas> {
        match &self.state {
            CompositorState::Ready(r) => Some(&r.canvas),
            CompositorState::Uninitialized => None,
        }
    }

    /// Draw the overlay of global frame `frame_idx` onto `scaled` and flatten the result.
    ///
    /// The first call fixes crop and render sizes from `cropped` and `scaled`; later frames
    /// must match them.
    pub fn compose(
        &mut self,
        frame_idx: u64,
        cropped: &Frame,
        scaled: &Frame,
        data: &ObservationData,
        trajectories: &TrajectoryMap,
        settings: &RenderSettings,
    ) -> ClipResult<Frame> {
        if let CompositorState::Uninitialized = self.state {
            self.state = CompositorState::Ready(self.ready(cropped, scaled, settings)?);
        }
        let CompositorState::Ready(ready) = &mut self.state else {
            return Err(ClipError::media("overlay compositor failed to initialize"));
        };

        let render = FrameSize::of_image(scaled);
        if render != ready.canvas.render_size() {
            return Err(ClipError::size_mismatch(format!(
                "frame {frame_idx} is {render}, overlay canvas is {}",
                ready.canvas.render_size()
            )));
        }

        let scene = build_scene(frame_idx, data, trajectories, settings, &ready.crop)?;
        let pixmap = raster::rasterize(&scene, &ready.canvas, ready.metrics, ready.text.as_mut())?;
        composite::composite_overlay(
            scaled,
            pixmap.data_as_u8_slice(),
            FrameSize::new(u32::from(pixmap.width()), u32::from(pixmap.height())),
            settings.background_color,
        )
    }

    fn ready(&self, cropped: &Frame, scaled: &Frame, settings: &RenderSettings) -> ClipResult<Ready> {
        let canvas = OverlayCanvas::new(
            self.original,
            FrameSize::of_image(scaled),
            Some(FrameSize::of_image(cropped)),
        );
        let text = match (&self.font, settings.draw_label) {
            (Some(font), true) => Some(LabelTextEngine::new(font)?),
            (None, true) => {
                tracing::warn!("no label font available, labels are skipped");
                None
            }
            (_, false) => None,
        };
        tracing::debug!(
            render = %canvas.render_size(),
            dpi = canvas.dpi(),
            scale = canvas.scale(),
            "overlay compositor ready"
        );
        Ok(Ready {
            metrics: raster::StrokeMetrics::new(&canvas, settings.overlay_size),
            crop: CropFrame::new(self.roi, self.original),
            canvas,
            text,
        })
    }
}
