//! Ethoclip renders short, annotated video snippets of animal behavior.
//!
//! A snippet covers a padded frame window of one or more concatenated video files, optionally
//! cropped to the region the observed individuals occupy, with their pose skeletons and
//! behavior labels drawn on top. Outputs are content-addressed: the file name carries a hash
//! of every render-determining input, so an unchanged request is served from disk.
//!
//! - Build a [`SnippetRequest`] from video files, a frame window, trajectories, observations
//!   and a committed [`RenderSettings`] snapshot
//! - Open it as a [`VideoSnippet`] and [`cut`](VideoSnippet::cut) it, or hand it to a
//!   [`SnippetWorker`] to render in the background
#![forbid(unsafe_code)]

pub mod encode;
pub mod foundation;
pub mod geometry;
pub mod media;
pub mod overlay;
pub mod settings;
pub mod snippet;
pub mod trajectory;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Frame, FrameInterval, FrameSize, Point};
pub use crate::foundation::error::{ClipError, ClipResult};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkFactory, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, SinkFactory};
pub use crate::geometry::Roi;
pub use crate::media::capture::{CaptureProperty, MultiStreamCapture};
pub use crate::media::source::{FfmpegFileSource, FrameSource, MemoryFrameSource, StreamInfo};
pub use crate::settings::{RenderSettings, SettingsEvent, SettingsStore, SizePreset};
pub use crate::snippet::{
    CancelToken, Observation, ObservationData, ProgressSink, RenderOutcome, SharedProgress,
    SnippetRequest, SnippetWorker, VideoSnippet,
};
pub use crate::trajectory::{PoseTrajectory, Trajectory, TrajectoryError, TrajectoryMap};
