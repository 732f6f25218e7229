use crate::{FetchFailure, RequestToken, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<T> {
    /// User edited the search input (raw, per-keystroke text).
    InputEdited(String),
    /// The scheduled quiet-period timer fired.
    DebounceElapsed { timer_id: TimerId },
    /// The transport produced a payload for the request with this token.
    FetchSucceeded { token: RequestToken, payload: T },
    /// The transport failed for the request with this token.
    FetchFailed {
        token: RequestToken,
        error: FetchFailure,
    },
    /// Caller-invoked retry: re-issue the fetch for the current stable key.
    RefetchRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
