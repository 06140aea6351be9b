use std::path::{Path, PathBuf};
use std::sync::Arc;

use kurbo::Rect;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig, SinkFactory};
use crate::foundation::core::{FrameInterval, FrameSize};
use crate::foundation::error::{ClipError, ClipResult};
use crate::geometry::{Roi, compute_roi, crop_and_scale, padded_interval, padded_roi, scaled_size};
use crate::media::capture::MultiStreamCapture;
use crate::media::source::{FfmpegFileSource, FrameSource};
use crate::overlay::{LabelFont, OverlayCompositor};
use crate::snippet::control::{CancelToken, ProgressSink};
use crate::snippet::request::{SnippetPlan, SnippetRequest, is_cached};

/// How a call to [`VideoSnippet::cut`] ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every frame was rendered and the output finalized.
    Completed,
    /// The output already existed; nothing was rendered.
    Cached,
    /// The cancel token fired; the partial output was removed.
    Cancelled,
    /// Rendering stopped on an error; the partial output was removed.
    Failed(String),
}

impl RenderOutcome {
    /// `true` when the output file is available afterwards.
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed | Self::Cached)
    }
}

/// One snippet: a request bound to the capture its frames are read from.
pub struct VideoSnippet<S: FrameSource = FfmpegFileSource> {
    request: SnippetRequest,
    capture: MultiStreamCapture<S>,
}

impl VideoSnippet<FfmpegFileSource> {
    /// Open the request's video files as one ffmpeg-decoded stream.
    pub fn open(request: SnippetRequest) -> ClipResult<Self> {
        if request.video_files.is_empty() {
            return Err(ClipError::configuration("specify video_files"));
        }
        request.settings.validate()?;
        let capture = MultiStreamCapture::open(&request.video_files)?;
        Ok(Self { request, capture })
    }
}

impl<S: FrameSource> VideoSnippet<S> {
    /// Bind `request` to an already-opened capture. Fails on invalid render settings.
    pub fn with_capture(request: SnippetRequest, capture: MultiStreamCapture<S>) -> ClipResult<Self> {
        request.settings.validate()?;
        Ok(Self { request, capture })
    }

    pub fn request(&self) -> &SnippetRequest {
        &self.request
    }

    pub fn capture(&self) -> &MultiStreamCapture<S> {
        &self.capture
    }

    pub fn video_size(&self) -> FrameSize {
        FrameSize::new(self.capture.width(), self.capture.height())
    }

    /// Requested window widened by `interval_padding` seconds, clamped to the stream.
    pub fn padded_interval(&self) -> ClipResult<FrameInterval> {
        padded_interval(
            self.request.start,
            self.request.stop,
            self.request.settings.interval_padding,
            self.capture.fps(),
            self.capture.total_frames(),
        )
    }

    /// Bounding box of every observed individual over the padded window.
    ///
    /// `None` when cropping is disabled, no trajectories are attached, or none has data in
    /// the window.
    pub fn roi(&self) -> ClipResult<Option<Rect>> {
        if self.request.trajectories.is_empty() || !self.request.settings.crop_roi {
            return Ok(None);
        }
        let interval = self.padded_interval()?;
        Ok(compute_roi(
            &self.request.trajectories,
            self.request.observation_data.individuals(),
            interval,
        ))
    }

    pub fn padded_roi(&self) -> ClipResult<Option<Roi>> {
        let Some(roi) = self.roi()? else {
            return Ok(None);
        };
        padded_roi(roi, self.request.settings.roi_padding(), self.video_size()).map(Some)
    }

    pub fn plan(&self) -> ClipResult<SnippetPlan> {
        Ok(SnippetPlan {
            interval: self.padded_interval()?,
            roi: self.padded_roi()?,
        })
    }

    /// Size of the encoded frames for `plan`.
    pub fn render_size(&self, plan: &SnippetPlan) -> FrameSize {
        let crop = plan.roi.map_or(self.video_size(), |r| r.size());
        let settings = &self.request.settings;
        scaled_size(
            crop,
            settings.max_render_width,
            settings.max_render_height,
            Some(settings.macro_block_size),
        )
    }

    /// Deterministic cache path of this snippet; see [`SnippetRequest::output_path`].
    pub fn output_path(&self) -> ClipResult<PathBuf> {
        self.request.output_path(&self.plan()?)
    }

    /// Render the snippet to its cache path unless it already exists there.
    ///
    /// Never fails: errors, read failures and cancellation become a [`RenderOutcome`], and
    /// any partially written output is removed.
    #[tracing::instrument(
        skip_all,
        fields(start = self.request.start, stop = self.request.stop)
    )]
    pub fn cut(
        &mut self,
        factory: &dyn SinkFactory,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancelToken,
    ) -> RenderOutcome {
        let resolved = self
            .plan()
            .and_then(|plan| Ok((self.request.output_path(&plan)?, plan)));
        let (out_path, plan) = match resolved {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "snippet cannot be rendered");
                return RenderOutcome::Failed(e.to_string());
            }
        };

        if is_cached(&out_path) {
            report(progress, 100.0);
            tracing::info!(out = %out_path.display(), "snippet already rendered");
            return RenderOutcome::Cached;
        }

        let mut partial = PartialOutput::new(&out_path);
        let outcome = match self.render(&plan, &out_path, factory, progress, cancel) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, out = %out_path.display(), "snippet render failed");
                RenderOutcome::Failed(e.to_string())
            }
        };
        if outcome == RenderOutcome::Completed {
            partial.keep();
        }
        tracing::info!(out = %out_path.display(), ?outcome, "snippet render finished");
        outcome
    }

    fn render(
        &mut self,
        plan: &SnippetPlan,
        out_path: &Path,
        factory: &dyn SinkFactory,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancelToken,
    ) -> ClipResult<RenderOutcome> {
        let settings = Arc::clone(&self.request.settings);
        let total = plan.interval.len_frames();
        if total == 0 {
            return Err(ClipError::validation(format!(
                "padded interval {}..{} holds no frames",
                plan.interval.start, plan.interval.stop
            )));
        }
        ensure_parent_dir(out_path)?;

        let font = if settings.draw_label {
            LabelFont::resolve(settings.label_font.as_deref())?
        } else {
            None
        };
        let mut compositor = OverlayCompositor::new(self.video_size(), plan.roi, font);

        tracing::info!(
            out = %out_path.display(),
            frames = total,
            start = plan.interval.start,
            roi = ?plan.roi,
            size = %self.render_size(plan),
            "rendering snippet"
        );

        self.capture.seek(plan.interval.start)?;
        let mut sink: Option<Box<dyn FrameSink>> = None;
        for done in 0..total {
            if cancel.is_cancelled() {
                tracing::info!(done, total, "snippet render cancelled");
                return Ok(RenderOutcome::Cancelled);
            }
            let Some(frame) = self.capture.read()? else {
                return Err(ClipError::media(format!(
                    "stream ended after {done} of {total} frames"
                )));
            };
            let frame_idx = self
                .capture
                .last_read_frame()
                .unwrap_or(plan.interval.start + done);

            let (cropped, scaled) = crop_and_scale(
                &frame,
                plan.roi,
                settings.max_render_width,
                settings.max_render_height,
                Some(settings.macro_block_size),
            )?;
            let composed = compositor.compose(
                frame_idx,
                &cropped,
                &scaled,
                &self.request.observation_data,
                &self.request.trajectories,
                &settings,
            )?;

            if sink.is_none() {
                let mut opened = factory.create(out_path)?;
                opened.begin(SinkConfig {
                    width: composed.width(),
                    height: composed.height(),
                    fps: self.capture.fps(),
                    macro_block_size: settings.macro_block_size,
                })?;
                sink = Some(opened);
            }
            if let Some(sink) = sink.as_mut() {
                sink.push_frame(done, &composed)?;
            }
            report(progress, 100.0 * (done + 1) as f64 / total as f64);
        }

        if let Some(mut sink) = sink {
            sink.end()?;
        }
        Ok(RenderOutcome::Completed)
    }
}

impl<S: FrameSource> std::fmt::Debug for VideoSnippet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSnippet")
            .field("request", &self.request)
            .field("capture", &self.capture)
            .finish()
    }
}

fn report(progress: Option<&dyn ProgressSink>, percent: f64) {
    if let Some(p) = progress {
        p.report(percent);
    }
}

/// Removes the output file on drop unless the render completed.
struct PartialOutput {
    path: PathBuf,
    keep: bool,
}

impl PartialOutput {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            keep: false,
        }
    }

    fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed partial output"),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove partial output")
            }
        }
    }
}
