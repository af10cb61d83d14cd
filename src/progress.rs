// src/progress.rs
use crate::search::SearchState;

/// Lightweight progress reporting for a running search.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// The orchestrator moved to a new state.
    fn stage(&mut self, _state: SearchState) {}

    /// Called by the frontend once the job is done, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
