//! Snippet requests, their content-addressed cache, and the render pipeline.

pub mod cache;
pub mod control;
pub mod observation;
pub mod pipeline;
pub mod request;
pub mod worker;

pub use control::{CancelToken, ProgressSink, SharedProgress};
pub use observation::{Observation, ObservationData};
pub use pipeline::{RenderOutcome, VideoSnippet};
pub use request::{SnippetPlan, SnippetRequest};
pub use worker::SnippetWorker;
