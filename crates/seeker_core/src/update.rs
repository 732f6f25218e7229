use crate::{Effect, Msg, RequestStatus, SearchState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update<T>(mut state: SearchState<T>, msg: Msg<T>) -> (SearchState<T>, Vec<Effect>) {
    let effects = match msg {
        Msg::InputEdited(text) => {
            state.debounce.raw_value = text;
            state.mark_dirty();

            // Cancel-and-restart: every edit replaces the pending timer,
            // even when the text is unchanged.
            let mut effects = Vec::with_capacity(2);
            if let Some(old) = state.debounce.pending_timer.take() {
                effects.push(Effect::CancelDebounce { timer_id: old });
            }
            let timer_id = state.mint_timer_id();
            state.debounce.pending_timer = Some(timer_id);
            effects.push(Effect::ScheduleDebounce {
                timer_id,
                delay: state.settings.debounce_delay,
            });
            effects
        }
        Msg::DebounceElapsed { timer_id } => {
            if state.debounce.pending_timer != Some(timer_id) {
                // A cancelled or superseded timer firing late.
                return (state, Vec::new());
            }
            state.debounce.pending_timer = None;

            let value = state.debounce.raw_value.clone();
            if state.debounce.stable_value.as_deref() == Some(value.as_str()) {
                // Input settled back on the value we already fetched for;
                // not a key change.
                return (state, Vec::new());
            }
            state.debounce.stable_value = Some(value.clone());
            state.mark_dirty();
            apply_key_change(&mut state, &value)
        }
        Msg::FetchSucceeded { token, payload } => {
            if state.fetch.current_token != Some(token) {
                // Stale response for a superseded request; drop silently.
                return (state, Vec::new());
            }
            state.fetch.status = RequestStatus::Success;
            state.fetch.data = Some(payload);
            state.fetch.error = None;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FetchFailed { token, error } => {
            if state.fetch.current_token != Some(token) {
                return (state, Vec::new());
            }
            state.fetch.status = RequestStatus::Error;
            state.fetch.error = Some(error);
            // `data` is deliberately left alone: the consumer keeps showing
            // the last successful payload next to the error message.
            state.mark_dirty();
            Vec::new()
        }
        Msg::RefetchRequested => match state.debounce.stable_value.clone() {
            Some(key) if !key.trim().is_empty() => {
                state.mark_dirty();
                start_fetch(&mut state, key)
            }
            _ => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// The stable value changed: either go idle (empty key) or issue a fetch.
fn apply_key_change<T>(state: &mut SearchState<T>, key: &str) -> Vec<Effect> {
    if key.trim().is_empty() {
        let mut effects = Vec::new();
        if state.fetch.status == RequestStatus::Loading {
            if let Some(token) = state.fetch.current_token {
                effects.push(Effect::AbortFetch { token });
            }
        }
        // Invalidating the token means a late response for the in-flight
        // request can never match, whether or not the abort lands.
        state.fetch.status = RequestStatus::Idle;
        state.fetch.data = None;
        state.fetch.error = None;
        state.fetch.current_token = None;
        effects
    } else {
        start_fetch(state, key.to_owned())
    }
}

fn start_fetch<T>(state: &mut SearchState<T>, key: String) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if state.fetch.status == RequestStatus::Loading {
        if let Some(token) = state.fetch.current_token {
            effects.push(Effect::AbortFetch { token });
        }
    }
    let token = state.mint_token();
    state.fetch.current_token = Some(token);
    state.fetch.status = RequestStatus::Loading;
    state.fetch.error = None;
    effects.push(Effect::StartFetch { token, key });
    effects
}
