use std::sync::{Mutex, RwLock};

use activity_engine::{Action, DashboardState, reduce};
use chrono::Utc;

use crate::background::LiveUpdates;
use crate::dashboard_config::DashboardConfig;
use crate::store::EventStore;

pub struct AppState {
    pub store: EventStore,
    pub config: DashboardConfig,
    ui: RwLock<DashboardState>,
    pub live: Mutex<LiveUpdates>,
}

impl AppState {
    pub fn new(store: EventStore, config: DashboardConfig) -> Self {
        let ui = config.initial_state(Utc::now());
        AppState {
            store,
            config,
            ui: RwLock::new(ui),
            live: Mutex::new(LiveUpdates::new()),
        }
    }

    /// Current UI state; callers render from this copy without holding the lock.
    pub fn snapshot(&self) -> DashboardState {
        self.ui.read().unwrap().clone()
    }

    /// Runs the reducer and stores the result.
    pub fn dispatch(&self, action: Action) -> DashboardState {
        let mut ui = self.ui.write().unwrap();
        *ui = reduce(&ui, action);
        ui.clone()
    }
}
