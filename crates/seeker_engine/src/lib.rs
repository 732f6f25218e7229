//! Seeker engine: executes the effects of the debounced-search core.
//!
//! The core decides *what* should happen (timers, fetches, aborts); this
//! crate owns *how*: a tokio runtime on a dedicated thread, a reqwest-backed
//! JSON fetcher, and the [`SearchSession`] glue object that a consuming view
//! creates on mount and disposes on unmount.
mod engine;
mod fetch;
mod session;
mod types;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, FetcherBuildError, JsonFetcher};
pub use session::SearchSession;
pub use types::EngineEvent;
