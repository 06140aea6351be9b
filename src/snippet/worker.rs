use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::SinkFactory;
use crate::foundation::error::ClipResult;
use crate::media::source::FrameSource;
use crate::snippet::control::{CancelToken, ProgressSink, SharedProgress};
use crate::snippet::pipeline::{RenderOutcome, VideoSnippet};
use crate::snippet::request::is_cached;

/// Runs at most one snippet render at a time on a background thread.
///
/// Starting a new render cancels and joins the one in flight first.
#[derive(Debug, Default)]
pub struct SnippetWorker {
    progress: SharedProgress,
    ready: Arc<Mutex<Option<PathBuf>>>,
    active: Option<ActiveRender>,
    finished: Option<RenderOutcome>,
}

#[derive(Debug)]
struct ActiveRender {
    cancel: CancelToken,
    handle: JoinHandle<RenderOutcome>,
}

impl SnippetWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress of the current render; back at `0` once it ends.
    pub fn progress(&self) -> SharedProgress {
        self.progress.clone()
    }

    /// Start rendering `snippet` and return its output path.
    ///
    /// A cached output is made ready immediately without spawning a render.
    pub fn start<S>(
        &mut self,
        mut snippet: VideoSnippet<S>,
        factory: Arc<dyn SinkFactory>,
    ) -> ClipResult<PathBuf>
    where
        S: FrameSource + 'static,
    {
        self.interrupt();
        self.finished = None;

        let out_path = snippet.output_path()?;
        if is_cached(&out_path) {
            self.set_ready(Some(out_path.clone()));
            self.finished = Some(RenderOutcome::Cached);
            return Ok(out_path);
        }
        self.set_ready(None);

        let cancel = CancelToken::new();
        let token = cancel.clone();
        let progress = self.progress.clone();
        let ready = Arc::clone(&self.ready);
        let ready_path = out_path.clone();
        let handle = std::thread::Builder::new()
            .name("ethoclip-render".to_owned())
            .spawn(move || {
                let outcome = snippet.cut(
                    factory.as_ref(),
                    Some(&progress as &dyn ProgressSink),
                    &token,
                );
                if outcome.succeeded() {
                    *ready.lock().unwrap_or_else(|e| e.into_inner()) = Some(ready_path);
                }
                progress.reset();
                outcome
            })
            .context("failed to spawn render thread")?;

        self.active = Some(ActiveRender { cancel, handle });
        Ok(out_path)
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.handle.is_finished())
    }

    /// Cancel the render in flight, wait for it to clean up, and reset progress.
    pub fn interrupt(&mut self) -> Option<RenderOutcome> {
        let active = self.active.take()?;
        active.cancel.cancel();
        let outcome = join(active.handle);
        self.progress.reset();
        Some(outcome)
    }

    /// Wait for the current render and return how it ended.
    ///
    /// Returns the outcome of a cache hit once, `None` when nothing was started.
    pub fn wait(&mut self) -> Option<RenderOutcome> {
        match self.active.take() {
            Some(active) => Some(join(active.handle)),
            None => self.finished.take(),
        }
    }

    /// Output of the last successful render or cache hit.
    pub fn ready_output(&self) -> Option<PathBuf> {
        self.ready.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_ready(&self, path: Option<PathBuf>) {
        *self.ready.lock().unwrap_or_else(|e| e.into_inner()) = path;
    }
}

impl Drop for SnippetWorker {
    fn drop(&mut self) {
        self.interrupt();
    }
}

fn join(handle: JoinHandle<RenderOutcome>) -> RenderOutcome {
    handle.join().unwrap_or_else(|_| {
        tracing::warn!("render thread panicked");
        RenderOutcome::Failed("render thread panicked".to_owned())
    })
}
