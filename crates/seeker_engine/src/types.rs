use seeker_core::{FetchFailure, RequestToken, TimerId};

/// Events delivered from the engine thread back to the owning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent<T> {
    /// A scheduled quiet-period timer fired without being cancelled.
    TimerElapsed { timer_id: TimerId },
    /// The fetch issued under `token` finished. An aborted fetch emits
    /// nothing at all.
    FetchCompleted {
        token: RequestToken,
        result: Result<T, FetchFailure>,
    },
}
