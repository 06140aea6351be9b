use std::{
    io::Read as _,
    path::Path,
    process::{Child, ChildStdout},
};

use crate::{
    foundation::core::Frame,
    foundation::error::{ClipError, ClipResult},
    media::probe::{VideoSourceInfo, probe_video},
};

/// Stream properties shared by every file of a multi-file capture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: u64,
}

impl StreamInfo {
    /// Two streams can be concatenated when width, height and fps agree.
    pub fn same_format(&self, other: &StreamInfo) -> bool {
        self.width == other.width
            && self.height == other.height
            && (self.fps - other.fps).abs() <= 1e-9
    }
}

/// A seekable, sequentially readable source of decoded frames for one file.
pub trait FrameSource: Send {
    fn info(&self) -> StreamInfo;

    /// Position the source so that the next [`read`](Self::read) yields local frame `frame`.
    fn seek(&mut self, frame: u64) -> ClipResult<()>;

    /// Read the next frame, or `Ok(None)` once the source is exhausted.
    fn read(&mut self) -> ClipResult<Option<Frame>>;
}

/// Frame source backed by a streaming system `ffmpeg` decode process.
///
/// Seeking restarts the decoder at the requested frame; sequential reads pull raw `rgb24`
/// frames from the child's stdout without respawning.
pub struct FfmpegFileSource {
    probed: VideoSourceInfo,
    info: StreamInfo,
    next_frame: u64,
    decoder: Option<DecoderProcess>,
    exhausted: bool,
}

impl std::fmt::Debug for FfmpegFileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegFileSource")
            .field("source_path", &self.probed.source_path)
            .field("info", &self.info)
            .field("next_frame", &self.next_frame)
            .field("decoding", &self.decoder.is_some())
            .finish()
    }
}

impl FfmpegFileSource {
    pub fn open(path: &Path) -> ClipResult<Self> {
        if !path.is_file() {
            return Err(ClipError::configuration(format!(
                "error opening video: '{}'",
                path.display()
            )));
        }
        let probed = probe_video(path).map_err(|e| {
            ClipError::configuration(format!("error opening video '{}': {e}", path.display()))
        })?;
        let info = probed.stream_info();
        if info.width == 0 || info.height == 0 || info.fps.is_nan() || info.fps <= 0.0 {
            return Err(ClipError::configuration(format!(
                "video '{}' reports invalid geometry {}x{} @ {} fps",
                path.display(),
                info.width,
                info.height,
                info.fps
            )));
        }
        Ok(Self {
            probed,
            info,
            next_frame: 0,
            decoder: None,
            exhausted: false,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.probed.source_path
    }

    fn frame_len(&self) -> usize {
        self.info.width as usize * self.info.height as usize * 3
    }
}

impl FrameSource for FfmpegFileSource {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn seek(&mut self, frame: u64) -> ClipResult<()> {
        if frame > self.info.frame_count {
            return Err(ClipError::out_of_range(format!(
                "local frame {frame} beyond '{}' ({} frames)",
                self.probed.source_path.display(),
                self.info.frame_count
            )));
        }
        if self.decoder.is_some() && frame == self.next_frame {
            return Ok(());
        }
        self.decoder = None;
        self.exhausted = false;
        self.next_frame = frame;
        Ok(())
    }

    fn read(&mut self) -> ClipResult<Option<Frame>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.decoder.is_none() {
            self.decoder = Some(DecoderProcess::spawn(
                &self.probed,
                self.next_frame,
                self.info.fps,
            )?);
        }
        let frame_len = self.frame_len();
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; frame_len];
        match decoder.stdout.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                if let Some(decoder) = self.decoder.take() {
                    decoder.finish()?;
                }
                return Ok(None);
            }
            Err(e) => {
                return Err(ClipError::media(format!(
                    "failed to read decoded frame from ffmpeg: {e}"
                )));
            }
        }

        self.next_frame += 1;
        let frame = Frame::from_raw(self.info.width, self.info.height, buf)
            .ok_or_else(|| ClipError::media("decoded frame buffer has unexpected length"))?;
        Ok(Some(frame))
    }
}

struct DecoderProcess {
    child: Child,
    stdout: ChildStdout,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl DecoderProcess {
    #[cfg(feature = "media-ffmpeg")]
    fn spawn(source: &VideoSourceInfo, start_frame: u64, fps: f64) -> ClipResult<Self> {
        use std::process::{Command, Stdio};

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .args(["-v", "error", "-nostdin"]);
        if start_frame > 0 {
            // Half a frame back so timestamp rounding lands on `start_frame`, not its predecessor.
            let t = (start_frame as f64 - 0.5) / fps;
            cmd.args(["-ss", &format!("{t:.6}")]);
        }
        cmd.arg("-i")
            .arg(&source.source_path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"]);

        let mut child = cmd.spawn().map_err(|e| {
            ClipError::media(format!(
                "failed to spawn ffmpeg decoder (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipError::media("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClipError::media("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(
            path = %source.source_path.display(),
            start_frame,
            "spawned ffmpeg decoder"
        );
        Ok(Self {
            child,
            stdout,
            stderr_drain: Some(stderr_drain),
        })
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    fn spawn(_source: &VideoSourceInfo, _start_frame: u64, _fps: f64) -> ClipResult<Self> {
        Err(ClipError::media(
            "decoding video files requires the 'media-ffmpeg' feature",
        ))
    }

    /// Reap a decoder that reached end of stream, surfacing ffmpeg failures.
    fn finish(mut self) -> ClipResult<()> {
        let status = self
            .child
            .wait()
            .map_err(|e| ClipError::media(format!("failed to wait for ffmpeg decoder: {e}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ClipError::media("ffmpeg stderr drain thread panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !status.success() {
            return Err(ClipError::media(format!(
                "ffmpeg decoder exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for DecoderProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

/// In-memory frame source over pre-decoded frames.
///
/// Counts every successful read through a shared counter so callers can observe decode work.
#[derive(Clone, Debug)]
pub struct MemoryFrameSource {
    frames: std::sync::Arc<Vec<Frame>>,
    fps: f64,
    cursor: usize,
    reads: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<Frame>, fps: f64) -> ClipResult<Self> {
        let Some(first) = frames.first() else {
            return Err(ClipError::configuration("in-memory source needs at least one frame"));
        };
        let dims = first.dimensions();
        if frames.iter().any(|f| f.dimensions() != dims) {
            return Err(ClipError::configuration(
                "in-memory source frames must share one size",
            ));
        }
        Ok(Self {
            frames: std::sync::Arc::new(frames),
            fps,
            cursor: 0,
            reads: std::sync::Arc::default(),
        })
    }

    /// Attach a counter shared with other sources.
    pub fn with_read_counter(mut self, reads: std::sync::Arc<std::sync::atomic::AtomicU64>) -> Self {
        self.reads = reads;
        self
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl FrameSource for MemoryFrameSource {
    fn info(&self) -> StreamInfo {
        let (width, height) = self.frames[0].dimensions();
        StreamInfo {
            width,
            height,
            fps: self.fps,
            frame_count: self.frames.len() as u64,
        }
    }

    fn seek(&mut self, frame: u64) -> ClipResult<()> {
        if frame > self.frames.len() as u64 {
            return Err(ClipError::out_of_range(format!(
                "local frame {frame} beyond {} frames",
                self.frames.len()
            )));
        }
        self.cursor = frame as usize;
        Ok(())
    }

    fn read(&mut self) -> ClipResult<Option<Frame>> {
        let Some(frame) = self.frames.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        self.reads
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Ok(Some(frame.clone()))
    }
}
