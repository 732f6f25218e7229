use std::time::Duration;

use crate::{RequestToken, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm a one-shot timer that delivers `Msg::DebounceElapsed` after `delay`.
    ScheduleDebounce { timer_id: TimerId, delay: Duration },
    /// Cancel a previously scheduled timer. A timer that fires anyway is
    /// ignored by `update`, so cancellation only saves work.
    CancelDebounce { timer_id: TimerId },
    /// Issue the request for `key` under the given token.
    StartFetch { token: RequestToken, key: String },
    /// Best-effort physical cancellation of a superseded request. The token
    /// gate in `update` is the correctness mechanism; this only saves
    /// bandwidth when the transport supports it.
    AbortFetch { token: RequestToken },
}
