use std::sync::Arc;

use seeker_core::{update, Msg, SearchSettings, SearchState, SearchViewModel};

use crate::fetch::Fetcher;
use crate::{EngineEvent, EngineHandle};

/// One debounced-search lifecycle: raw edits in, view models out.
///
/// The consuming view creates a session when it mounts, feeds it every
/// keystroke via [`SearchSession::edit`], drains results with
/// [`SearchSession::pump`] on its event loop, and calls
/// [`SearchSession::dispose`] when it goes away. A disposed session cancels
/// its pending timer and in-flight fetch and ignores every further call, so
/// nothing can mutate state on behalf of a dead view.
pub struct SearchSession<T> {
    state: SearchState<T>,
    engine: EngineHandle<T>,
    disposed: bool,
}

impl<T: Clone + Send + 'static> SearchSession<T> {
    pub fn new(settings: SearchSettings, fetcher: Arc<dyn Fetcher<T>>) -> Self {
        Self {
            state: SearchState::with_settings(settings),
            engine: EngineHandle::new(fetcher),
            disposed: false,
        }
    }

    /// Feed one raw input edit (call per keystroke).
    pub fn edit(&mut self, text: impl Into<String>) {
        self.apply(Msg::InputEdited(text.into()));
    }

    /// Re-issue the fetch for the current stable key under a fresh token.
    /// The only retry mechanism; nothing is retried automatically.
    pub fn refetch(&mut self) {
        self.apply(Msg::RefetchRequested);
    }

    /// Drain pending engine events into the state machine. Returns true if
    /// the view model changed since the last pump.
    pub fn pump(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        while let Some(event) = self.engine.try_recv() {
            let msg = match event {
                EngineEvent::TimerElapsed { timer_id } => Msg::DebounceElapsed { timer_id },
                EngineEvent::FetchCompleted { token, result } => {
                    if self.state.current_token() != Some(token) {
                        seeker_logging::seeker_debug!(
                            "dropping stale response for token {token}"
                        );
                    }
                    match result {
                        Ok(payload) => Msg::FetchSucceeded { token, payload },
                        Err(error) => Msg::FetchFailed { token, error },
                    }
                }
            };
            self.apply(msg);
        }
        self.state.consume_dirty()
    }

    pub fn view(&self) -> SearchViewModel<T> {
        self.state.view()
    }

    /// Cancel all pending work; every later call on this session is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for effect in self.state.dispose() {
            self.engine.execute(effect);
        }
    }

    fn apply(&mut self, msg: Msg<T>) {
        if self.disposed {
            return;
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.engine.execute(effect);
        }
    }
}
