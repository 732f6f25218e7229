use crate::{FetchFailure, RequestStatus};

/// Snapshot handed to the display surface. Rendering branches four ways on
/// `status`; everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchViewModel<T> {
    /// The text exactly as last typed, echoed back per keystroke.
    pub raw_value: String,
    /// The last value that survived a full quiet period, if any.
    pub stable_value: Option<String>,
    /// Distinguishes "no input has quiesced yet" (`false`) from "user
    /// cleared the input" (`true` with an empty `stable_value`).
    pub has_value: bool,
    pub status: RequestStatus,
    /// Last successfully fetched payload. Retained across a later error so
    /// the consumer can keep showing it alongside the error message.
    pub data: Option<T>,
    pub error: Option<FetchFailure>,
    pub dirty: bool,
}
