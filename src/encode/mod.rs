//! Encoding sinks.
//!
//! Sinks consume composited snippet frames in stream order.

/// `ffmpeg`-based sink (h264 output via system `ffmpeg`).
pub mod ffmpeg;
/// Frame sink contract, factories and the in-memory sink.
pub mod sink;
