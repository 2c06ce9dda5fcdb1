use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use activity_engine::{
    Action, ChartView, DashboardState, Granularity, RangeMode, WeekStart, reduce,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paths::{DEFAULT_BIND, DEFAULT_DATASET};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind: String,
    pub dataset: PathBuf,
    pub week_start: WeekStart,
    pub default_granularity: Granularity,
    pub default_range: RangeMode,
    pub default_view: ChartView,
    /// Start with the live-update timer running.
    pub live_updates: bool,
    pub live_update_secs: u64,
    /// Every Nth live tick announces new data; 0 disables the toast.
    pub notify_every_ticks: u64,
    /// Artificial delay before an export completes.
    pub export_delay_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            bind: DEFAULT_BIND.to_owned(),
            dataset: PathBuf::from(DEFAULT_DATASET),
            week_start: WeekStart::Sunday,
            default_granularity: Granularity::Daily,
            default_range: RangeMode::Last30Days,
            default_view: ChartView::Heatmap,
            live_updates: false,
            live_update_secs: 30,
            notify_every_ticks: 4,
            export_delay_ms: 800,
        }
    }
}

impl DashboardConfig {
    /// Dashboard state a fresh session starts from.
    pub fn initial_state(&self, now: DateTime<Utc>) -> DashboardState {
        let mut state = DashboardState::new(now);
        for action in [
            Action::SetRangeMode {
                mode: self.default_range,
            },
            Action::SetGranularity {
                granularity: self.default_granularity,
            },
            Action::SetWeekStart {
                week_start: self.week_start,
            },
            Action::SetView {
                view: self.default_view,
            },
        ] {
            state = reduce(&state, action);
        }
        if self.live_updates {
            state = reduce(&state, Action::ToggleLiveUpdates);
        }
        state
    }
}

/// Loads the dashboard config. Returns `DashboardConfig::default()` if the
/// file doesn't exist; propagates other I/O and parse errors.
pub fn load(path: &Path) -> io::Result<DashboardConfig> {
    match fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DashboardConfig::default()),
        Err(e) => Err(e),
    }
}
