use std::sync::{mpsc, Arc};
use std::thread;

use seeker_core::{Effect, RequestToken, TimerId};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::fetch::Fetcher;
use crate::EngineEvent;

/// Handle to the effect-execution thread.
///
/// Commands are the core's [`Effect`] values, sent as-is; results come back
/// as [`EngineEvent`]s drained with [`EngineHandle::try_recv`]. Dropping the
/// handle closes the command channel, which stops the thread and tears down
/// the runtime along with any in-flight work.
pub struct EngineHandle<T> {
    cmd_tx: mpsc::Sender<Effect>,
    event_rx: mpsc::Receiver<EngineEvent<T>>,
}

impl<T: Send + 'static> EngineHandle<T> {
    pub fn new(fetcher: Arc<dyn Fetcher<T>>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // The core supersedes timers and fetches one at a time, so one
            // slot of each is all the bookkeeping this thread needs.
            let mut pending_timer: Option<(TimerId, JoinHandle<()>)> = None;
            let mut in_flight: Option<(RequestToken, CancellationToken)> = None;

            while let Ok(effect) = cmd_rx.recv() {
                match effect {
                    Effect::ScheduleDebounce { timer_id, delay } => {
                        if let Some((_, handle)) = pending_timer.take() {
                            handle.abort();
                        }
                        let tx = event_tx.clone();
                        let handle = runtime.spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = tx.send(EngineEvent::TimerElapsed { timer_id });
                        });
                        pending_timer = Some((timer_id, handle));
                    }
                    Effect::CancelDebounce { timer_id } => {
                        if let Some((pending, handle)) = pending_timer.take() {
                            if pending == timer_id {
                                handle.abort();
                            } else {
                                pending_timer = Some((pending, handle));
                            }
                        }
                    }
                    Effect::StartFetch { token, key } => {
                        if let Some((_, cancel)) = in_flight.take() {
                            cancel.cancel();
                        }
                        let cancel = CancellationToken::new();
                        in_flight = Some((token, cancel.clone()));
                        let fetcher = fetcher.clone();
                        let tx = event_tx.clone();
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = cancel.cancelled() => {
                                    seeker_logging::seeker_debug!(
                                        "fetch aborted for token {token}"
                                    );
                                }
                                result = fetcher.fetch(token, &key) => {
                                    let _ = tx.send(EngineEvent::FetchCompleted { token, result });
                                }
                            }
                        });
                    }
                    Effect::AbortFetch { token } => {
                        if let Some((current, cancel)) = in_flight.take() {
                            if current == token {
                                cancel.cancel();
                            } else {
                                in_flight = Some((current, cancel));
                            }
                        }
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn execute(&self, effect: Effect) {
        let _ = self.cmd_tx.send(effect);
    }

    pub fn try_recv(&self) -> Option<EngineEvent<T>> {
        self.event_rx.try_recv().ok()
    }
}
