use std::time::Duration;

use crate::view_model::SearchViewModel;
use crate::{Effect, FetchFailure};

pub type TimerId = u64;
pub type RequestToken = u64;

/// Four-way status of the current fetch cycle. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period that must elapse after the last edit before the raw
    /// value is promoted to the stable value.
    pub debounce_delay: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
        }
    }
}

/// Debounce side of the machine.
///
/// `stable_value = None` means no input has quiesced yet; `Some("")` means
/// the user cleared the input. Consumers that care about the difference
/// branch on `has_value` in the view model instead of testing emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DebounceState {
    pub(crate) raw_value: String,
    pub(crate) stable_value: Option<String>,
    pub(crate) pending_timer: Option<TimerId>,
}

/// Fetch side of the machine.
///
/// `current_token` is `None` exactly when no request is authoritative, so a
/// response arriving after an empty-key transition can never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub(crate) status: RequestStatus,
    pub(crate) data: Option<T>,
    pub(crate) error: Option<FetchFailure>,
    pub(crate) current_token: Option<RequestToken>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Idle,
            data: None,
            error: None,
            current_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<T> {
    pub(crate) settings: SearchSettings,
    pub(crate) debounce: DebounceState,
    pub(crate) fetch: FetchState<T>,
    pub(crate) next_timer_id: TimerId,
    pub(crate) next_token: RequestToken,
    pub(crate) dirty: bool,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self::with_settings(SearchSettings::default())
    }
}

impl<T> SearchState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            settings,
            debounce: DebounceState::default(),
            fetch: FetchState::default(),
            next_timer_id: 0,
            next_token: 0,
            dirty: false,
        }
    }

    /// Token of the request whose response would currently be applied, if any.
    pub fn current_token(&self) -> Option<RequestToken> {
        self.fetch.current_token
    }

    /// Returns whether the view model changed since the last call, and
    /// resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Tear down the machine: forget the pending timer and invalidate the
    /// current token, returning the effects that cancel both physically.
    /// Any timer or response that still arrives afterwards fails its id or
    /// token check in `update` and is a no-op.
    pub fn dispose(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(timer_id) = self.debounce.pending_timer.take() {
            effects.push(Effect::CancelDebounce { timer_id });
        }
        if let Some(token) = self.fetch.current_token.take() {
            if self.fetch.status == RequestStatus::Loading {
                effects.push(Effect::AbortFetch { token });
            }
        }
        effects
    }

    pub(crate) fn mint_timer_id(&mut self) -> TimerId {
        self.next_timer_id += 1;
        self.next_timer_id
    }

    pub(crate) fn mint_token(&mut self) -> RequestToken {
        self.next_token += 1;
        self.next_token
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl<T: Clone> SearchState<T> {
    pub fn view(&self) -> SearchViewModel<T> {
        SearchViewModel {
            raw_value: self.debounce.raw_value.clone(),
            stable_value: self.debounce.stable_value.clone(),
            has_value: self.debounce.stable_value.is_some(),
            status: self.fetch.status,
            data: self.fetch.data.clone(),
            error: self.fetch.error.clone(),
            dirty: self.dirty,
        }
    }
}
