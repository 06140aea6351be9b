use std::path::{Path, PathBuf};

use crate::{
    foundation::core::Frame,
    foundation::error::{ClipError, ClipResult},
    media::source::{FfmpegFileSource, FrameSource, StreamInfo},
};

/// Properties queryable through [`MultiStreamCapture::get`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureProperty {
    FrameWidth,
    FrameHeight,
    Fps,
    /// Total frames across all files.
    FrameCount,
    /// Global index of the next frame to be read.
    PosFrames,
    PosMsec,
    FourCc,
}

/// An ordered list of video files presented as one continuous, seekable stream.
///
/// All files must share width, height and fps. Global frame `f` lives in the file `i` with
/// `cumulative_frames[i - 1] <= f < cumulative_frames[i]`.
pub struct MultiStreamCapture<S: FrameSource = FfmpegFileSource> {
    sources: Vec<S>,
    info: StreamInfo,
    frames: Vec<u64>,
    cumulative_frames: Vec<u64>,
    total_frames: u64,
    position: u64,
    active: usize,
    last_read: Option<u64>,
    paths: Vec<PathBuf>,
}

impl MultiStreamCapture<FfmpegFileSource> {
    /// Open every file with an ffmpeg-backed source.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> ClipResult<Self> {
        if paths.is_empty() {
            return Err(ClipError::configuration("specify at least one video"));
        }
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(FfmpegFileSource::open(path.as_ref())?);
        }
        let mut capture = Self::from_sources(sources)?;
        capture.paths = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        Ok(capture)
    }
}

impl<S: FrameSource> MultiStreamCapture<S> {
    /// Build a capture over already-opened sources.
    pub fn from_sources(sources: Vec<S>) -> ClipResult<Self> {
        let Some(first) = sources.first() else {
            return Err(ClipError::configuration("specify at least one video"));
        };
        let info = first.info();

        let mut frames = Vec::with_capacity(sources.len());
        let mut cumulative_frames = Vec::with_capacity(sources.len());
        let mut total_frames = 0u64;
        for (idx, source) in sources.iter().enumerate() {
            let source_info = source.info();
            if !source_info.same_format(&info) {
                return Err(ClipError::configuration(format!(
                    "all videos must have the same dimensions and fps: video {idx} is {}x{} @ {} fps, expected {}x{} @ {} fps",
                    source_info.width,
                    source_info.height,
                    source_info.fps,
                    info.width,
                    info.height,
                    info.fps
                )));
            }
            total_frames += source_info.frame_count;
            frames.push(source_info.frame_count);
            cumulative_frames.push(total_frames);
        }

        Ok(Self {
            sources,
            info: StreamInfo {
                frame_count: total_frames,
                ..info
            },
            frames,
            cumulative_frames,
            total_frames,
            position: 0,
            active: 0,
            last_read: None,
            paths: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn fps(&self) -> f64 {
        self.info.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Global cursor: the frame the next [`read`](Self::read) returns.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Global index of the frame most recently returned by [`read`](Self::read).
    pub fn last_read_frame(&self) -> Option<u64> {
        self.last_read
    }

    pub fn active_file_index(&self) -> usize {
        self.active
    }

    /// Per-file frame counts, in file order.
    pub fn frames(&self) -> &[u64] {
        &self.frames
    }

    pub fn cumulative_frames(&self) -> &[u64] {
        &self.cumulative_frames
    }

    /// File paths this capture was opened from (empty for [`from_sources`](Self::from_sources)).
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn info(&self) -> StreamInfo {
        self.info
    }

    pub fn get(&self, property: CaptureProperty) -> ClipResult<f64> {
        match property {
            CaptureProperty::FrameWidth => Ok(f64::from(self.width())),
            CaptureProperty::FrameHeight => Ok(f64::from(self.height())),
            CaptureProperty::Fps => Ok(self.fps()),
            CaptureProperty::FrameCount => Ok(self.total_frames as f64),
            CaptureProperty::PosFrames => Ok(self.position as f64),
            other => Err(ClipError::unsupported_property(format!(
                "{other:?} is not supported by a multi-file capture"
            ))),
        }
    }

    /// Only [`CaptureProperty::PosFrames`] is settable; it is equivalent to [`seek`](Self::seek).
    pub fn set(&mut self, property: CaptureProperty, value: f64) -> ClipResult<()> {
        if property != CaptureProperty::PosFrames {
            return Err(ClipError::unsupported_property(format!(
                "{property:?} cannot be set on a multi-file capture"
            )));
        }
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(ClipError::out_of_range(format!(
                "frame must be an integer within [0, {}], got {value}",
                self.total_frames.saturating_sub(1)
            )));
        }
        self.seek(value as u64)
    }

    /// Position the global cursor at `global_frame`.
    pub fn seek(&mut self, global_frame: u64) -> ClipResult<()> {
        if global_frame >= self.total_frames {
            return Err(ClipError::out_of_range(format!(
                "frame must be within [0, {}], got {global_frame}",
                self.total_frames.saturating_sub(1)
            )));
        }

        let idx = self
            .cumulative_frames
            .partition_point(|&cum| cum <= global_frame);
        let first_frame = self.first_frame_of(idx);
        self.sources[idx].seek(global_frame - first_frame)?;
        self.active = idx;
        self.position = global_frame;
        self.last_read = None;
        Ok(())
    }

    /// Read the next frame of the concatenated stream, or `Ok(None)` at its end.
    ///
    /// Exhausting one file moves on to the start of the next one transparently.
    pub fn read(&mut self) -> ClipResult<Option<Frame>> {
        if self.position >= self.total_frames || self.at_end() {
            return Ok(None);
        }

        loop {
            if let Some(frame) = self.sources[self.active].read()? {
                self.last_read = Some(self.position);
                self.position = (self.position + 1).min(self.total_frames - 1);
                return Ok(Some(frame));
            }

            let last_file = self.sources.len() - 1;
            if self.active >= last_file {
                return Ok(None);
            }
            self.active += 1;
            self.sources[self.active].seek(0)?;
            tracing::debug!(
                file = self.active,
                position = self.position,
                "advancing to next file"
            );
        }
    }

    fn first_frame_of(&self, idx: usize) -> u64 {
        if idx == 0 {
            0
        } else {
            self.cumulative_frames[idx - 1]
        }
    }

    // The cursor is clamped to the last frame, so "last frame already delivered" needs its
    // own check.
    fn at_end(&self) -> bool {
        self.last_read == Some(self.total_frames - 1)
    }
}

impl<S: FrameSource> std::fmt::Debug for MultiStreamCapture<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiStreamCapture")
            .field("info", &self.info)
            .field("frames", &self.frames)
            .field("position", &self.position)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/capture.rs"]
mod tests;
