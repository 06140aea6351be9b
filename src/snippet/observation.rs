use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One annotated behavior: `actor` does `category` (to `recipient`) over frames
/// `start..=stop`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub category: String,
    pub actor: String,
    #[serde(default)]
    pub recipient: Option<String>,
    pub start: u64,
    pub stop: u64,
    /// Additional annotation columns; they take part in the cache key.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Observation {
    pub fn new(category: impl Into<String>, actor: impl Into<String>, start: u64, stop: u64) -> Self {
        Self {
            category: category.into(),
            actor: actor.into(),
            recipient: None,
            start,
            stop,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Whether `frame` lies in the inclusive span of the observation.
    pub fn spans(&self, frame: u64) -> bool {
        self.start <= frame && frame <= self.stop
    }
}

/// Observations drawn into a snippet and the indices among them to highlight.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationData {
    #[serde(default)]
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub highlight: BTreeSet<usize>,
}

impl ObservationData {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            highlight: BTreeSet::new(),
        }
    }

    pub fn with_highlight(mut self, highlight: impl IntoIterator<Item = usize>) -> Self {
        self.highlight = highlight.into_iter().collect();
        self
    }

    /// Actor and recipient of the first observation; they define the overlay roles.
    pub fn roles(&self) -> (Option<&str>, Option<&str>) {
        match self.observations.first() {
            Some(o) => (Some(o.actor.as_str()), o.recipient.as_deref()),
            None => (None, None),
        }
    }

    /// Every actor and recipient, deduplicated and sorted.
    pub fn individuals(&self) -> BTreeSet<&str> {
        self.observations
            .iter()
            .flat_map(|o| std::iter::once(o.actor.as_str()).chain(o.recipient.as_deref()))
            .collect()
    }
}
