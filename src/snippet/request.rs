use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;

use crate::foundation::core::FrameInterval;
use crate::foundation::error::{ClipError, ClipResult};
use crate::geometry::roi::Roi;
use crate::settings::RenderSettings;
use crate::snippet::cache::content_hash;
use crate::snippet::observation::ObservationData;
use crate::trajectory::TrajectoryMap;

/// Every input that determines one rendered snippet.
///
/// Immutable for the duration of a render; settings are a committed snapshot.
#[derive(Clone)]
pub struct SnippetRequest {
    pub video_files: Vec<PathBuf>,
    /// First requested frame (global stream index).
    pub start: u64,
    /// End of the requested window (global stream index).
    pub stop: u64,
    pub trajectories: TrajectoryMap,
    pub observation_data: ObservationData,
    pub settings: Arc<RenderSettings>,
    /// Directory snippets are written to and looked up in.
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for SnippetRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetRequest")
            .field("video_files", &self.video_files)
            .field("start", &self.start)
            .field("stop", &self.stop)
            .field("trajectories", &self.trajectories.keys().collect::<Vec<_>>())
            .field("observations", &self.observation_data.observations.len())
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

/// Stream-dependent geometry of a request, resolved once before rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnippetPlan {
    pub interval: FrameInterval,
    pub roi: Option<Roi>,
}

impl SnippetRequest {
    pub fn new(video_files: Vec<PathBuf>, start: u64, stop: u64) -> Self {
        Self {
            video_files,
            start,
            stop,
            trajectories: TrajectoryMap::new(),
            observation_data: ObservationData::default(),
            settings: Arc::new(RenderSettings::default()),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_trajectories(mut self, trajectories: TrajectoryMap) -> Self {
        self.trajectories = trajectories;
        self
    }

    pub fn with_observations(mut self, data: ObservationData) -> Self {
        self.observation_data = data;
        self
    }

    pub fn with_settings(mut self, settings: Arc<RenderSettings>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Stem and extension (with leading dot, possibly empty) of the first video.
    pub fn base_name(&self) -> ClipResult<(String, String)> {
        let first = self
            .video_files
            .first()
            .ok_or_else(|| ClipError::configuration("specify video_files"))?;
        let name = first
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ClipError::configuration(format!("video '{}' has no file name", first.display()))
            })?;
        let ext = first
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Ok((name, ext))
    }

    /// Canonical description of the render, hashed into the cache key.
    pub fn identifier(&self, plan: &SnippetPlan) -> ClipResult<serde_json::Value> {
        let (name, ext) = self.base_name()?;
        let observation_data = serde_json::to_value(&self.observation_data)
            .map_err(|e| ClipError::configuration(format!("serialize observations: {e}")))?;
        Ok(json!({
            "name": name,
            "ext": ext,
            "video_files": self
                .video_files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect::<Vec<_>>(),
            "start": plan.interval.start,
            "stop": plan.interval.stop,
            "roi": plan.roi.map(|r| [r.x0, r.y0, r.x1, r.y1]),
            "trajectories": self.trajectories.keys().collect::<Vec<_>>(),
            "observation_data": observation_data,
            "render_settings": self.settings.config()?,
        }))
    }

    pub fn cache_key(&self, plan: &SnippetPlan) -> ClipResult<String> {
        Ok(content_hash(&self.identifier(plan)?))
    }

    /// `{output_dir}/{name}_{hash}{ext}`.
    pub fn output_path(&self, plan: &SnippetPlan) -> ClipResult<PathBuf> {
        let (name, ext) = self.base_name()?;
        let key = self.cache_key(plan)?;
        Ok(self.output_dir.join(format!("{name}_{key}{ext}")))
    }
}

/// Whether a cached snippet exists at `path`. Existence alone counts as valid.
pub fn is_cached(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "../../tests/unit/snippet/request.rs"]
mod tests;
