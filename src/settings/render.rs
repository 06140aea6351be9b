use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::error::{ClipError, ClipResult};

/// Smallest accepted max render width/height.
pub const MIN_RENDER_SIZE: u32 = 256;

/// Individuals whose overlay switches to the highlight color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightTarget {
    Actor,
    Recipient,
}

/// Named output size presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizePreset {
    Hd,
    #[default]
    FullHd,
    TwoPointSevenK,
    FourK,
    Customize,
}

impl SizePreset {
    pub const ALL: [SizePreset; 5] = [
        Self::Hd,
        Self::FullHd,
        Self::TwoPointSevenK,
        Self::FourK,
        Self::Customize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Hd => "HD (1280x720)",
            Self::FullHd => "Full HD (1920x1080)",
            Self::TwoPointSevenK => "2.7k (2704x1520)",
            Self::FourK => "4k (3840x2160)",
            Self::Customize => "customize",
        }
    }

    /// Max render size of the preset; `None` for [`SizePreset::Customize`].
    pub fn size(self) -> Option<(u32, u32)> {
        match self {
            Self::Hd => Some((1280, 720)),
            Self::FullHd => Some((1920, 1080)),
            Self::TwoPointSevenK => Some((2704, 1520)),
            Self::FourK => Some((3840, 2160)),
            Self::Customize => None,
        }
    }

    /// The preset matching `(width, height)`, else [`SizePreset::Customize`].
    pub fn for_size(width: u32, height: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.size() == Some((width, height)))
            .unwrap_or(Self::Customize)
    }
}

impl TryFrom<String> for SizePreset {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == value)
            .ok_or_else(|| format!("invalid size preset: {value}"))
    }
}

impl From<SizePreset> for String {
    fn from(p: SizePreset) -> Self {
        p.label().to_owned()
    }
}

/// Render configuration snapshot consumed read-only by a render.
///
/// Keypoints are indices into a trajectory's keypoint list; segments are keypoint pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Seconds added before the start and after the stop of the requested window.
    pub interval_padding: f64,
    pub crop_roi: bool,
    /// Pixels added around the ROI when cropping.
    pub roi_padding: u32,

    pub draw_trajectories: bool,
    pub available_keypoints: Vec<usize>,
    pub keypoints: Vec<usize>,
    pub available_segments: Vec<[usize; 2]>,
    pub segments: Vec<[usize; 2]>,
    pub actor_color: Color,
    pub recipient_color: Color,
    pub other_color: Color,
    pub apply_highlight_color_to: Vec<HighlightTarget>,
    /// Keypoint marker size in output pixels; segments use half of it.
    pub overlay_size: f64,

    pub draw_label: bool,
    pub text_color: Color,
    pub box_color: Color,

    pub highlight: bool,
    pub highlight_color: Color,
    /// Per-category highlight colors, falling back to `highlight_color`.
    pub override_highlight_color: BTreeMap<String, Color>,

    pub size_preset: SizePreset,
    pub max_render_width: u32,
    pub max_render_height: u32,
    pub macro_block_size: u32,

    /// Font file for labels; see [`crate::overlay::text::LabelFont::resolve`].
    pub label_font: Option<PathBuf>,
    /// Color remaining transparency is flattened onto.
    pub background_color: Color,
}

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(Color::BLACK)
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            interval_padding: 1.0,
            crop_roi: true,
            roi_padding: 100,
            draw_trajectories: true,
            available_keypoints: Vec::new(),
            keypoints: Vec::new(),
            available_segments: Vec::new(),
            segments: Vec::new(),
            actor_color: hex("#FF6965"),
            recipient_color: hex("#65D4FF"),
            other_color: hex("#E6E6E6"),
            apply_highlight_color_to: Vec::new(),
            overlay_size: 5.0,
            draw_label: true,
            text_color: Color::BLACK,
            box_color: Color::WHITE,
            highlight: true,
            highlight_color: hex("#FC0000"),
            override_highlight_color: BTreeMap::new(),
            size_preset: SizePreset::FullHd,
            max_render_width: 1920,
            max_render_height: 1080,
            macro_block_size: 8,
            label_font: None,
            background_color: Color::WHITE,
        }
    }
}

impl RenderSettings {
    /// ROI padding in pixels, `0` when cropping is off.
    pub fn roi_padding(&self) -> u32 {
        if self.crop_roi { self.roi_padding } else { 0 }
    }

    pub fn apply_highlight_color_to_actor(&self) -> bool {
        self.apply_highlight_color_to
            .contains(&HighlightTarget::Actor)
    }

    pub fn apply_highlight_color_to_recipient(&self) -> bool {
        self.apply_highlight_color_to
            .contains(&HighlightTarget::Recipient)
    }

    /// Highlight color of `category`: its override, else the global highlight color.
    pub fn highlight_color_for(&self, category: &str) -> Color {
        self.override_highlight_color
            .get(category)
            .copied()
            .unwrap_or(self.highlight_color)
    }

    pub fn segment_pairs(&self) -> Vec<(usize, usize)> {
        self.segments.iter().map(|[a, b]| (*a, *b)).collect()
    }

    /// Select a preset; anything but `Customize` also sets the max render size.
    pub fn set_size_preset(&mut self, preset: SizePreset) {
        self.size_preset = preset;
        if let Some((w, h)) = preset.size() {
            self.max_render_width = w;
            self.max_render_height = h;
        }
    }

    /// Set the max render size and re-derive the matching preset.
    pub fn set_max_render_size(&mut self, width: u32, height: u32) {
        self.max_render_width = width;
        self.max_render_height = height;
        self.size_preset = SizePreset::for_size(width, height);
    }

    /// Replace the available keypoints, keeping the selected ones that survive.
    ///
    /// Falls back to selecting every available keypoint when none survive.
    pub fn set_available_keypoints(&mut self, available: Vec<usize>) {
        self.available_keypoints = available;
        let mut keypoints: Vec<usize> = self
            .keypoints
            .iter()
            .copied()
            .filter(|k| self.available_keypoints.contains(k))
            .collect();
        if keypoints.is_empty() {
            keypoints = self.available_keypoints.clone();
        }
        self.set_keypoints(keypoints);
    }

    /// Replace the selected keypoints and reconcile segments.
    ///
    /// Available segments become every unordered pair of selected keypoints. Selected
    /// segments not in that set are dropped; if none survive and at least two keypoints are
    /// selected, the consecutive chain is selected.
    pub fn set_keypoints(&mut self, keypoints: Vec<usize>) {
        self.available_segments = keypoints
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| keypoints[i + 1..].iter().map(move |&b| [a, b]))
            .collect();
        let mut segments: Vec<[usize; 2]> = self
            .segments
            .iter()
            .copied()
            .filter(|s| self.available_segments.contains(s))
            .collect();
        if segments.is_empty() && keypoints.len() > 1 {
            segments = keypoints.windows(2).map(|w| [w[0], w[1]]).collect();
        }
        self.keypoints = keypoints;
        self.segments = segments;
    }

    /// Restore defaults, keeping keypoint and segment selections.
    pub fn reset(&mut self) {
        let defaults = Self {
            available_keypoints: std::mem::take(&mut self.available_keypoints),
            keypoints: std::mem::take(&mut self.keypoints),
            available_segments: std::mem::take(&mut self.available_segments),
            segments: std::mem::take(&mut self.segments),
            ..Self::default()
        };
        *self = defaults;
    }

    /// Render-determining configuration as JSON (available keypoints/segments excluded).
    pub fn config(&self) -> ClipResult<serde_json::Value> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| ClipError::configuration(format!("serialize render settings: {e}")))?;
        if let Some(map) = value.as_object_mut() {
            map.remove("available_keypoints");
            map.remove("available_segments");
        }
        Ok(value)
    }

    pub fn validate(&self) -> ClipResult<()> {
        if !self.interval_padding.is_finite() || self.interval_padding < 0.0 {
            return Err(ClipError::configuration(format!(
                "interval_padding must be a non-negative number of seconds, got {}",
                self.interval_padding
            )));
        }
        if self.macro_block_size == 0 {
            return Err(ClipError::configuration("macro_block_size must be positive"));
        }
        for (name, value) in [
            ("max_render_width", self.max_render_width),
            ("max_render_height", self.max_render_height),
        ] {
            if value < MIN_RENDER_SIZE {
                return Err(ClipError::configuration(format!(
                    "{name} must be >= {MIN_RENDER_SIZE}, got {value}"
                )));
            }
            if value < self.macro_block_size {
                return Err(ClipError::configuration(format!(
                    "{name} ({value}) must be >= macro_block_size ({})",
                    self.macro_block_size
                )));
            }
        }
        if !self.overlay_size.is_finite() || self.overlay_size < 0.0 {
            return Err(ClipError::configuration(format!(
                "overlay_size must be non-negative, got {}",
                self.overlay_size
            )));
        }
        if !self.available_keypoints.is_empty()
            && let Some(k) = self
                .keypoints
                .iter()
                .find(|k| !self.available_keypoints.contains(k))
        {
            return Err(ClipError::configuration(format!(
                "keypoint {k} is not among the available keypoints"
            )));
        }
        if !self.keypoints.is_empty()
            && let Some([a, b]) = self
                .segments
                .iter()
                .find(|[a, b]| !self.keypoints.contains(a) || !self.keypoints.contains(b))
        {
            return Err(ClipError::configuration(format!(
                "segment {a} - {b} references an unselected keypoint"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/render.rs"]
mod tests;
