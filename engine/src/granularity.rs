//! Time-bucket widths and the period keys they group events by.
//!
//! Each granularity is a [`PeriodStrategy`]: it maps an event to its period
//! and enumerates the ordered period series for a list of events, either
//! densely (daily, weekly) or sparsely (hourly, monthly, yearly).

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Timelike};
use tracing::debug;
use serde::{Deserialize, Serialize, Serializer};

use crate::event::ActivityEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Hourly,
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Yearly,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }

    pub fn strategy(self, week_start: WeekStart) -> Box<dyn PeriodStrategy> {
        match self {
            Granularity::Hourly => Box::new(Hourly),
            Granularity::Daily => Box::new(Daily),
            Granularity::Weekly => Box::new(Weekly { week_start }),
            Granularity::Monthly => Box::new(Monthly),
            Granularity::Yearly => Box::new(Yearly),
        }
    }
}

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// The week-start day on or before `date`, clamped to `NaiveDate::MIN`.
    pub fn anchor(&self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        date.checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// One aggregation window.
///
/// A series only ever holds one variant, so the derived ordering is
/// chronological within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Hour { date: NaiveDate, hour: u32 },
    Day(NaiveDate),
    /// Keyed by the week's anchor date.
    Week(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    /// Canonical key, unique within a granularity series.
    pub fn key(&self) -> String {
        match self {
            Period::Hour { date, hour } => format!("{} {hour:02}", date.format("%Y-%m-%d")),
            Period::Day(date) | Period::Week(date) => date.format("%Y-%m-%d").to_string(),
            Period::Month { year, month } => format!("{year:04}-{month:02}"),
            Period::Year(year) => format!("{year:04}"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Period::Hour { date, hour } => format!("{}, {hour:02}:00", date.format("%b %d")),
            Period::Day(date) => date.format("%b %d, %Y").to_string(),
            Period::Week(date) => format!("Week of {}", date.format("%b %d, %Y")),
            Period::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| self.key()),
            Period::Year(year) => year.to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

pub trait PeriodStrategy {
    /// Period an event is grouped into.
    fn period_of(&self, event: &ActivityEvent) -> Period;

    /// Ascending, duplicate-free period series covering `events`.
    fn periods(&self, events: &[&ActivityEvent]) -> Vec<Period>;
}

fn sparse_periods(strategy: &dyn PeriodStrategy, events: &[&ActivityEvent]) -> Vec<Period> {
    events
        .iter()
        .map(|e| strategy.period_of(e))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Longest dense series; wider spans fall back to sparse periods.
pub const MAX_DENSE_PERIODS: i64 = 20_000;

fn date_span(events: &[&ActivityEvent]) -> Option<(NaiveDate, NaiveDate)> {
    let first = events.iter().map(|e| e.date).min()?;
    let last = events.iter().map(|e| e.date).max()?;
    Some((first, last))
}

fn too_wide(periods: i64) -> bool {
    if periods > MAX_DENSE_PERIODS {
        debug!("{periods} periods exceed the dense limit, using observed periods only");
        return true;
    }
    false
}

/// Groups by the hour of `timestamp`; sparse.
pub struct Hourly;

impl PeriodStrategy for Hourly {
    fn period_of(&self, event: &ActivityEvent) -> Period {
        Period::Hour {
            date: event.timestamp.date_naive(),
            hour: event.timestamp.hour(),
        }
    }

    fn periods(&self, events: &[&ActivityEvent]) -> Vec<Period> {
        sparse_periods(self, events)
    }
}

/// Groups by `date`; dense over every calendar day between the earliest and
/// latest event.
pub struct Daily;

impl PeriodStrategy for Daily {
    fn period_of(&self, event: &ActivityEvent) -> Period {
        Period::Day(event.date)
    }

    fn periods(&self, events: &[&ActivityEvent]) -> Vec<Period> {
        let Some((first, last)) = date_span(events) else {
            return Vec::new();
        };
        if too_wide((last - first).num_days()) {
            return sparse_periods(self, events);
        }
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(Period::Day)
            .collect()
    }
}

/// Groups by the anchored week containing `date`; dense over calendar weeks.
pub struct Weekly {
    pub week_start: WeekStart,
}

impl PeriodStrategy for Weekly {
    fn period_of(&self, event: &ActivityEvent) -> Period {
        Period::Week(self.week_start.anchor(event.date))
    }

    fn periods(&self, events: &[&ActivityEvent]) -> Vec<Period> {
        let Some((first, last)) = date_span(events) else {
            return Vec::new();
        };
        if too_wide((last - first).num_weeks()) {
            return sparse_periods(self, events);
        }
        let last_anchor = self.week_start.anchor(last);
        self.week_start
            .anchor(first)
            .iter_weeks()
            .take_while(|d| *d <= last_anchor)
            .map(Period::Week)
            .collect()
    }
}

pub struct Monthly;

impl PeriodStrategy for Monthly {
    fn period_of(&self, event: &ActivityEvent) -> Period {
        Period::Month {
            year: event.date.year(),
            month: event.date.month(),
        }
    }

    fn periods(&self, events: &[&ActivityEvent]) -> Vec<Period> {
        sparse_periods(self, events)
    }
}

pub struct Yearly;

impl PeriodStrategy for Yearly {
    fn period_of(&self, event: &ActivityEvent) -> Period {
        Period::Year(event.date.year())
    }

    fn periods(&self, events: &[&ActivityEvent]) -> Vec<Period> {
        sparse_periods(self, events)
    }
}
