use std::collections::HashSet;

use serde::Serialize;

use crate::event::{ActivityEvent, StatusCounts};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub unique_users: usize,
    pub unique_devices: usize,
    pub total: usize,
    pub counts: StatusCounts,
    /// Percentage of successful events, one decimal place; 0 when empty.
    pub success_rate: f64,
}

impl SummaryStats {
    pub fn from_events(events: &[&ActivityEvent]) -> Self {
        let users: HashSet<&str> = events.iter().map(|e| e.user.as_str()).collect();
        let devices: HashSet<&str> = events.iter().map(|e| e.device.as_str()).collect();
        let counts: StatusCounts = events.iter().copied().collect();
        let total = counts.total();

        let success_rate = if total == 0 {
            0.0
        } else {
            round1(counts.success as f64 / total as f64 * 100.0)
        };

        SummaryStats {
            unique_users: users.len(),
            unique_devices: devices.len(),
            total,
            counts,
            success_rate,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
