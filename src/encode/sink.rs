use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::foundation::core::Frame;
use crate::foundation::error::{ClipError, ClipResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second (the source stream's rate).
    pub fps: f64,
    /// Codec alignment both dimensions must honor. `0` or `1` disables the check.
    pub macro_block_size: u32,
}

impl SinkConfig {
    pub fn validate(&self) -> ClipResult<()> {
        if self.fps.is_nan() || self.fps <= 0.0 || self.fps.is_infinite() {
            return Err(ClipError::validation(format!(
                "sink fps must be positive and finite, got {}",
                self.fps
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ClipError::validation("sink width/height must be non-zero"));
        }
        let block = self.macro_block_size;
        if block > 1 && (!self.width.is_multiple_of(block) || !self.height.is_multiple_of(block)) {
            return Err(ClipError::validation(format!(
                "sink size {}x{} is not divisible by macro block size {block}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Sink contract for consuming frames in stream order.
///
/// `push_frame` is called with strictly increasing indices between `begin` and `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ClipResult<()>;
    /// Push one opaque RGB frame.
    fn push_frame(&mut self, idx: u64, frame: &Frame) -> ClipResult<()>;
    /// Called once after the last frame; finalizes the output.
    fn end(&mut self) -> ClipResult<()>;
}

/// Creates the sink a render writes its output file through.
pub trait SinkFactory: Send + Sync {
    fn create(&self, out_path: &Path) -> ClipResult<Box<dyn FrameSink>>;
}

impl<F> SinkFactory for F
where
    F: Fn(&Path) -> ClipResult<Box<dyn FrameSink>> + Send + Sync,
{
    fn create(&self, out_path: &Path) -> ClipResult<Box<dyn FrameSink>> {
        self(out_path)
    }
}

/// Frames captured by an [`InMemorySink`], shareable after the sink is boxed away.
pub type CapturedFrames = Arc<Mutex<Vec<(u64, Frame)>>>;

/// In-memory sink for tests and debugging.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    cfg: Arc<Mutex<Option<SinkConfig>>>,
    frames: CapturedFrames,
    ended: Arc<std::sync::atomic::AtomicBool>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Shared handle to the captured frames.
    pub fn frames(&self) -> CapturedFrames {
        Arc::clone(&self.frames)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(std::sync::atomic::Ordering::Acquire)
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ClipResult<()> {
        cfg.validate()?;
        *self.cfg.lock().unwrap_or_else(|e| e.into_inner()) = Some(cfg);
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.ended
            .store(false, std::sync::atomic::Ordering::Release);
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &Frame) -> ClipResult<()> {
        let cfg = self
            .config()
            .ok_or_else(|| ClipError::media("in-memory sink not started"))?;
        if frame.dimensions() != (cfg.width, cfg.height) {
            return Err(ClipError::size_mismatch(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ClipResult<()> {
        self.ended.store(true, std::sync::atomic::Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
