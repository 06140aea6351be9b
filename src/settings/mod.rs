//! Render settings: the committed snapshot the pipeline reads and the staged store editors write.

pub mod render;
pub mod store;

pub use render::{HighlightTarget, RenderSettings, SizePreset};
pub use store::{SettingsEvent, SettingsStore};
