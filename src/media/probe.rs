use std::path::{Path, PathBuf};

use crate::foundation::error::{ClipError, ClipResult};
use crate::media::source::StreamInfo;

/// Metadata of a single video file as reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
    /// Container-declared frame count, when present.
    pub nb_frames: Option<u64>,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    /// Declared frame count, falling back to `round(duration * fps)`.
    pub fn frame_count(&self) -> u64 {
        match self.nb_frames {
            Some(n) if n > 0 => n,
            _ => (self.duration_sec * self.source_fps()).round().max(0.0) as u64,
        }
    }

    pub fn stream_info(&self) -> StreamInfo {
        StreamInfo {
            width: self.width,
            height: self.height,
            fps: self.source_fps(),
            frame_count: self.frame_count(),
        }
    }
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> ClipResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ClipError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ClipError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ClipError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ClipError::media(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let width = video_stream
        .width
        .ok_or_else(|| ClipError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ClipError::media("missing video height from ffprobe"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| ClipError::media("invalid video r_frame_rate"))?;
    let duration_sec = video_stream
        .duration
        .as_ref()
        .or_else(|| parsed.format.as_ref().and_then(|f| f.duration.as_ref()))
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let nb_frames = video_stream
        .nb_frames
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok());

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        nb_frames,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> ClipResult<VideoSourceInfo> {
    Err(ClipError::media(
        "probing video files requires the 'media-ffmpeg' feature",
    ))
}

pub(crate) fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.trim().parse::<u32>().ok()?;
    let b = match parts.next() {
        Some(b) => b.trim().parse::<u32>().ok()?,
        None => 1,
    };
    if b == 0 {
        return None;
    }
    Some((a, b))
}
