//! Time-bucketing and aggregation for activity events.
//!
//! Events flow through [`TimeRangeFilter`], then [`DimensionFilter`], then
//! [`Bucketing`], which turns the surviving list into chart-ready
//! [`TimeBucket`] series and heatmap [`Grid`]s. Every stage is a pure
//! function of its input.

pub mod bucketing;
pub mod error;
pub mod event;
pub mod export;
pub mod filters;
pub mod granularity;
pub mod grid;
pub mod state;
pub mod summary;
pub mod time_range;

#[cfg(test)]
mod testing;

pub use bucketing::{Bucketing, TimeBucket, TrendDirection, trend_percent};
pub use error::EngineError;
pub use event::{ActivityEvent, Status, StatusCounts, parse_events};
pub use export::{CsvRow, ExportEnvelope, ExportFormat, csv_rows, to_csv};
pub use filters::{DimensionFilter, QuickStat};
pub use granularity::{Granularity, Period, PeriodStrategy, WeekStart};
pub use grid::{Grid, GridCell, GridRow, PeriodHeader};
pub use state::{Action, ChartView, DashboardState, Notification, NotificationLevel, Tab, reduce};
pub use summary::SummaryStats;
pub use time_range::{DateInterval, RangeMode, TimeRangeFilter};
