use std::sync::Arc;
use std::time::Duration;

use activity_engine::{Action, NotificationLevel};
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::LIVE_UPDATE_MESSAGE;
use crate::state::AppState;

/// Handle to the running live-update timer, if any.
///
/// The timer task watches a cancellation channel; toggling live updates off
/// signals it and the task exits at its next wake-up.
pub struct LiveUpdates {
    running: Option<(watch::Sender<bool>, JoinHandle<()>)>,
}

impl LiveUpdates {
    pub fn new() -> Self {
        Self { running: None }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts or stops the timer so that it matches `enabled`.
    pub fn sync(&mut self, state: &Arc<AppState>, enabled: bool) {
        if enabled && !self.is_running() {
            let period = Duration::from_secs(state.config.live_update_secs.max(1));
            self.start(Arc::clone(state), period);
        } else if !enabled {
            self.cancel();
        }
    }

    fn start(&mut self, state: Arc<AppState>, period: Duration) {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_timer(state, period, rx));
        info!("Live updates started ({}s interval)", period.as_secs());
        self.running = Some((tx, handle));
    }

    /// Signals the timer to stop. Returns its task handle so callers can
    /// wait for it to finish.
    pub fn cancel(&mut self) -> Option<JoinHandle<()>> {
        let (tx, handle) = self.running.take()?;
        // Receiver may already be gone if the task exited
        let _ = tx.send(true);
        info!("Live updates stopped");
        Some(handle)
    }
}

async fn run_timer(state: Arc<AppState>, period: Duration, mut cancel: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(period);
    // First tick fires immediately
    interval.tick().await;
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
                continue;
            }
        }

        ticks += 1;
        let now = Utc::now();
        state.dispatch(Action::Tick { at: now });
        debug!("Live update tick {ticks}");

        let every = state.config.notify_every_ticks;
        if every > 0 && ticks % every == 0 {
            state.dispatch(Action::Notify {
                level: NotificationLevel::Info,
                message: LIVE_UPDATE_MESSAGE.to_owned(),
                at: now,
            });
        }
    }
}

/// Starts the timer at boot when the config enables live updates.
pub fn spawn_background_workers(state: &Arc<AppState>) {
    let enabled = state.snapshot().live_updates;
    state.live.lock().unwrap().sync(state, enabled);
}
