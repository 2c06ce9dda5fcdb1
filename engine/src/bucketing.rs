use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{ActivityEvent, StatusCounts};
use crate::granularity::{Granularity, Period, PeriodStrategy, WeekStart};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn from_percent(percent: i64) -> Self {
        match percent {
            p if p > 0 => TrendDirection::Up,
            p if p < 0 => TrendDirection::Down,
            _ => TrendDirection::Stable,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Stable => "→",
        }
    }
}

/// Rounded percent change from `previous` to `current`.
///
/// The denominator is floored at 1 for every granularity, and the first
/// bucket of a series (no `previous`) is always flat. Halves round toward
/// positive infinity, so -12.5 becomes -12 and 12.5 becomes 13.
pub fn trend_percent(previous: Option<usize>, current: usize) -> i64 {
    let Some(previous) = previous else {
        return 0;
    };
    let delta = current as f64 - previous as f64;
    (delta / previous.max(1) as f64 * 100.0 + 0.5).floor() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    pub period: Period,
    pub period_label: String,
    pub total: usize,
    pub counts: StatusCounts,
    pub trend_percent: i64,
    pub trend_direction: TrendDirection,
}

/// Aggregation settings shared by the bucket series and the heatmap grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucketing {
    pub granularity: Granularity,
    #[serde(default)]
    pub week_start: WeekStart,
}

impl Bucketing {
    pub fn new(granularity: Granularity) -> Self {
        Bucketing {
            granularity,
            week_start: WeekStart::default(),
        }
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn strategy(&self) -> Box<dyn PeriodStrategy> {
        self.granularity.strategy(self.week_start)
    }

    /// Partitions `events` into ascending time buckets with status counts and
    /// trend against the preceding bucket. Empty input yields no buckets.
    pub fn buckets(&self, events: &[&ActivityEvent]) -> Vec<TimeBucket> {
        let strategy = self.strategy();

        let mut counts: HashMap<Period, StatusCounts> = HashMap::new();
        for event in events {
            counts
                .entry(strategy.period_of(event))
                .or_default()
                .record(event.status);
        }

        let mut previous: Option<usize> = None;
        let buckets: Vec<TimeBucket> = strategy
            .periods(events)
            .into_iter()
            .map(|period| {
                let counts = counts.get(&period).copied().unwrap_or_default();
                let total = counts.total();
                let trend = trend_percent(previous, total);
                previous = Some(total);
                TimeBucket {
                    period,
                    period_label: period.label(),
                    total,
                    counts,
                    trend_percent: trend,
                    trend_direction: TrendDirection::from_percent(trend),
                }
            })
            .collect();

        debug!(
            "bucketed {} events into {} {} buckets",
            events.len(),
            buckets.len(),
            self.granularity.display_name()
        );
        buckets
    }
}
