//! Seeker core: pure debounce and fetch-coordination state machine.
//!
//! Everything here is deterministic and free of I/O. The consumer feeds
//! [`Msg`] values into [`update`] and executes the returned [`Effect`]s on
//! whatever timer/transport substrate it owns; results come back as further
//! messages. Stale-response suppression is enforced here, by request token,
//! regardless of what the transport does.
mod effect;
mod failure;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use failure::{FailureKind, FetchFailure};
pub use msg::Msg;
pub use state::{
    DebounceState, FetchState, RequestStatus, RequestToken, SearchSettings, SearchState, TimerId,
};
pub use update::update;
pub use view_model::SearchViewModel;
