use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::ActivityEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeMode {
    #[serde(rename = "last24hours")]
    Last24Hours,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "last90days")]
    Last90Days,
    #[serde(rename = "lastYear")]
    LastYear,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "custom")]
    Custom,
}

impl RangeMode {
    pub const PRESETS: [RangeMode; 6] = [
        RangeMode::Last24Hours,
        RangeMode::Last7Days,
        RangeMode::Last30Days,
        RangeMode::Last90Days,
        RangeMode::LastYear,
        RangeMode::All,
    ];

    /// Length of a preset window, `None` for `All` and `Custom`.
    fn lookback(&self) -> Option<Duration> {
        match self {
            RangeMode::Last24Hours => Some(Duration::hours(24)),
            RangeMode::Last7Days => Some(Duration::days(7)),
            RangeMode::Last30Days => Some(Duration::days(30)),
            RangeMode::Last90Days => Some(Duration::days(90)),
            RangeMode::LastYear => Some(Duration::days(365)),
            RangeMode::All | RangeMode::Custom => None,
        }
    }

    /// Wire name, identical to the serde representation.
    pub fn key(&self) -> &'static str {
        match self {
            RangeMode::Last24Hours => "last24hours",
            RangeMode::Last7Days => "last7days",
            RangeMode::Last30Days => "last30days",
            RangeMode::Last90Days => "last90days",
            RangeMode::LastYear => "lastYear",
            RangeMode::All => "all",
            RangeMode::Custom => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RangeMode::Last24Hours => "24h",
            RangeMode::Last7Days => "7d",
            RangeMode::Last30Days => "30d",
            RangeMode::Last90Days => "90d",
            RangeMode::LastYear => "1y",
            RangeMode::All => "all",
            RangeMode::Custom => "custom",
        }
    }
}

/// Inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeFilter {
    pub mode: RangeMode,
    #[serde(default)]
    pub custom_start: Option<NaiveDate>,
    #[serde(default)]
    pub custom_end: Option<NaiveDate>,
}

impl TimeRangeFilter {
    pub fn preset(mode: RangeMode) -> Self {
        TimeRangeFilter {
            mode,
            custom_start: None,
            custom_end: None,
        }
    }

    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        TimeRangeFilter {
            mode: RangeMode::Custom,
            custom_start: start,
            custom_end: end,
        }
    }

    /// Resolves the filter to a concrete interval relative to `now`.
    ///
    /// Returns `None` only for a custom range with a missing bound, which
    /// selects nothing.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<DateInterval> {
        let today = now.date_naive();
        match self.mode {
            RangeMode::Custom => Some(DateInterval {
                start: self.custom_start?,
                end: self.custom_end?,
            }),
            RangeMode::All => Some(DateInterval {
                start: NaiveDate::from_ymd_opt(1970, 1, 1)?,
                end: today,
            }),
            preset => {
                let lookback = preset.lookback()?;
                Some(DateInterval {
                    start: (now - lookback).date_naive(),
                    end: today,
                })
            }
        }
    }

    /// Stable filter over the store: keeps input order, never re-sorts.
    pub fn apply<'a>(&self, events: &'a [ActivityEvent], now: DateTime<Utc>) -> Vec<&'a ActivityEvent> {
        let Some(interval) = self.resolve(now) else {
            debug!("custom range is missing a bound, selecting no events");
            return Vec::new();
        };
        let selected: Vec<&ActivityEvent> = events
            .iter()
            .filter(|e| interval.contains(e.date))
            .collect();
        debug!(
            "time range {:?} kept {} of {} events",
            self.mode,
            selected.len(),
            events.len()
        );
        selected
    }

    /// Human-readable form used in export envelopes.
    pub fn describe(&self) -> String {
        match self.mode {
            RangeMode::Custom => {
                let fmt = |d: Option<NaiveDate>| {
                    d.map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "?".to_owned())
                };
                format!("{} to {}", fmt(self.custom_start), fmt(self.custom_end))
            }
            mode => mode.key().to_owned(),
        }
    }
}

impl Default for TimeRangeFilter {
    fn default() -> Self {
        TimeRangeFilter::preset(RangeMode::All)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;
    use crate::event::Status;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_on(d: NaiveDate, user: &str) -> ActivityEvent {
        ActivityEvent {
            activity_type: "Login".to_owned(),
            status: Status::Success,
            user: user.to_owned(),
            device: "laptop".to_owned(),
            date: d,
            timestamp: FixedOffset::east_opt(0)
                .unwrap()
                .from_local_datetime(&d.and_hms_opt(12, 0, 0).unwrap())
                .unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_presets_resolve_relative_to_now() {
        let r = TimeRangeFilter::preset(RangeMode::Last7Days).resolve(now()).unwrap();
        assert_eq!(r.start, date(2025, 3, 24));
        assert_eq!(r.end, date(2025, 3, 31));

        let r = TimeRangeFilter::preset(RangeMode::Last24Hours).resolve(now()).unwrap();
        assert_eq!(r.start, date(2025, 3, 30));

        let r = TimeRangeFilter::preset(RangeMode::LastYear).resolve(now()).unwrap();
        assert_eq!(r.start, date(2024, 3, 31));
    }

    #[test]
    fn test_all_excludes_future_events() {
        let events = vec![
            event_on(date(1999, 1, 1), "a"),
            event_on(date(2025, 3, 31), "b"),
            event_on(date(2025, 4, 1), "c"),
        ];
        let kept = TimeRangeFilter::preset(RangeMode::All).apply(&events, now());
        let users: Vec<&str> = kept.iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, ["a", "b"]);
    }

    #[test]
    fn test_apply_preserves_input_order() {
        let events = vec![
            event_on(date(2025, 3, 30), "late"),
            event_on(date(2025, 3, 1), "outside"),
            event_on(date(2025, 3, 25), "early"),
        ];
        let kept = TimeRangeFilter::preset(RangeMode::Last7Days).apply(&events, now());
        let users: Vec<&str> = kept.iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, ["late", "early"]);
    }

    #[test]
    fn test_custom_range_is_inclusive() {
        let events = vec![
            event_on(date(2025, 1, 1), "start"),
            event_on(date(2025, 1, 15), "mid"),
            event_on(date(2025, 1, 31), "end"),
            event_on(date(2025, 2, 1), "after"),
        ];
        let filter = TimeRangeFilter::custom(Some(date(2025, 1, 1)), Some(date(2025, 1, 31)));
        assert_eq!(filter.apply(&events, now()).len(), 3);
    }

    #[test]
    fn test_custom_range_missing_bound_is_empty() {
        let events = vec![event_on(date(2025, 1, 1), "a")];
        let open_end = TimeRangeFilter::custom(Some(date(2024, 1, 1)), None);
        assert!(open_end.resolve(now()).is_none());
        assert!(open_end.apply(&events, now()).is_empty());

        let open_start = TimeRangeFilter::custom(None, Some(date(2026, 1, 1)));
        assert!(open_start.apply(&events, now()).is_empty());
    }

    #[test]
    fn test_describe() {
        assert_eq!(TimeRangeFilter::preset(RangeMode::Last30Days).describe(), "last30days");
        assert_eq!(TimeRangeFilter::preset(RangeMode::LastYear).describe(), "lastYear");
        assert_eq!(
            TimeRangeFilter::custom(Some(date(2025, 1, 1)), None).describe(),
            "2025-01-01 to ?"
        );
    }
}
