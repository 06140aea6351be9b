use std::sync::{Arc, mpsc};

use crate::foundation::color::Color;
use crate::foundation::error::ClipResult;
use crate::settings::render::RenderSettings;

/// Change notifications emitted by a [`SettingsStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    DraftChanged,
    Committed,
    Reverted,
    OverrideApplied { category: String },
    OverrideCleared { category: String },
}

/// Committed settings snapshot plus a staged draft.
///
/// Editors mutate the draft; `commit` validates it and atomically replaces the snapshot.
/// Renders only ever see [`snapshot`](Self::snapshot).
#[derive(Debug)]
pub struct SettingsStore {
    committed: Arc<RenderSettings>,
    draft: RenderSettings,
    subscribers: Vec<mpsc::Sender<SettingsEvent>>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl SettingsStore {
    pub fn new(initial: RenderSettings) -> Self {
        Self {
            draft: initial.clone(),
            committed: Arc::new(initial),
            subscribers: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<RenderSettings> {
        Arc::clone(&self.committed)
    }

    pub fn draft(&self) -> &RenderSettings {
        &self.draft
    }

    pub fn has_pending_changes(&self) -> bool {
        self.draft != *self.committed
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<SettingsEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut RenderSettings)) {
        f(&mut self.draft);
        self.emit(SettingsEvent::DraftChanged);
    }

    /// Validate the draft and publish it as the committed snapshot.
    pub fn commit(&mut self) -> ClipResult<Arc<RenderSettings>> {
        self.draft.validate()?;
        self.committed = Arc::new(self.draft.clone());
        self.emit(SettingsEvent::Committed);
        Ok(self.snapshot())
    }

    /// Discard the draft, returning it to the committed snapshot.
    pub fn revert(&mut self) {
        self.draft = (*self.committed).clone();
        self.emit(SettingsEvent::Reverted);
    }

    /// Reset the draft to defaults, keeping keypoint and segment selections.
    pub fn reset(&mut self) {
        self.draft.reset();
        self.emit(SettingsEvent::DraftChanged);
    }

    pub fn apply_override(&mut self, category: impl Into<String>, color: Color) {
        let category = category.into();
        self.draft
            .override_highlight_color
            .insert(category.clone(), color);
        self.emit(SettingsEvent::OverrideApplied { category });
    }

    /// Remove the draft's override for `category`; a no-op emits nothing.
    pub fn clear_override(&mut self, category: &str) {
        if self
            .draft
            .override_highlight_color
            .remove(category)
            .is_some()
        {
            self.emit(SettingsEvent::OverrideCleared {
                category: category.to_owned(),
            });
        }
    }

    /// Highlight color the draft resolves for `category`.
    pub fn highlight_color_for(&self, category: &str) -> Color {
        self.draft.highlight_color_for(category)
    }

    fn emit(&mut self, event: SettingsEvent) {
        // Drop subscribers whose receiver is gone.
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/store.rs"]
mod tests;
