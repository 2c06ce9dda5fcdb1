//! Dashboard UI state as one immutable value, advanced by [`reduce`].
//!
//! The aggregation functions never see this type; they only receive the
//! filtered event list and the bucketing settings it derives.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::bucketing::Bucketing;
use crate::event::{ActivityEvent, Status};
use crate::export::ExportFormat;
use crate::filters::{DimensionFilter, QuickStat};
use crate::granularity::{Granularity, WeekStart};
use crate::time_range::{RangeMode, TimeRangeFilter};

/// Oldest notifications are dropped beyond this many.
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    #[default]
    Heatmap,
    StackedBar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Chart,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Heatmap cell picked for drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub activity_type: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub range: TimeRangeFilter,
    pub dimensions: DimensionFilter,
    pub bucketing: Bucketing,
    pub view: ChartView,
    pub tab: Tab,
    pub selected_cell: Option<CellRef>,
    pub live_updates: bool,
    pub last_update: DateTime<Utc>,
    pub notifications: Vec<Notification>,
    pub next_notification_id: u64,
    /// One entry per export still in flight; exports may overlap.
    pub exporting: Vec<ExportFormat>,
}

impl DashboardState {
    pub fn new(now: DateTime<Utc>) -> Self {
        DashboardState {
            range: TimeRangeFilter::default(),
            dimensions: DimensionFilter::default(),
            bucketing: Bucketing::default(),
            view: ChartView::default(),
            tab: Tab::default(),
            selected_cell: None,
            live_updates: false,
            last_update: now,
            notifications: Vec::new(),
            next_notification_id: 1,
            exporting: Vec::new(),
        }
    }

    /// Time-range filter followed by the dimensional filter.
    pub fn filtered_events<'a>(
        &self,
        events: &'a [ActivityEvent],
        now: DateTime<Utc>,
    ) -> Vec<&'a ActivityEvent> {
        let in_range = self.range.apply(events, now);
        self.dimensions.apply(&in_range)
    }

    pub fn is_exporting(&self, format: ExportFormat) -> bool {
        self.exporting.contains(&format)
    }

    /// Drops one in-flight entry for `format`, leaving other exports alone.
    fn finish_export(&mut self, format: ExportFormat) {
        if let Some(pos) = self.exporting.iter().position(|f| *f == format) {
            self.exporting.remove(pos);
        }
    }

    fn push_notification(
        &mut self,
        level: NotificationLevel,
        message: String,
        at: DateTime<Utc>,
    ) {
        self.notifications.push(Notification {
            id: self.next_notification_id,
            level,
            message,
            created_at: at,
        });
        self.next_notification_id += 1;
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let excess = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..excess);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetRangeMode {
        mode: RangeMode,
    },
    SetCustomRange {
        #[serde(default, deserialize_with = "empty_as_none")]
        start: Option<NaiveDate>,
        #[serde(default, deserialize_with = "empty_as_none")]
        end: Option<NaiveDate>,
    },
    ToggleActivityType {
        activity_type: String,
    },
    ToggleStatus {
        status: Status,
    },
    /// Selecting the active quick stat again clears it.
    ToggleQuickStat {
        quick_stat: QuickStat,
    },
    ClearFilters,
    SetGranularity {
        granularity: Granularity,
    },
    SetWeekStart {
        week_start: WeekStart,
    },
    SetView {
        view: ChartView,
    },
    SetTab {
        tab: Tab,
    },
    SelectCell {
        activity_type: String,
        period: String,
    },
    CloseDetail,
    ToggleLiveUpdates,
    Tick {
        at: DateTime<Utc>,
    },
    Notify {
        level: NotificationLevel,
        message: String,
        at: DateTime<Utc>,
    },
    DismissNotification {
        id: u64,
    },
    ExportStarted {
        format: ExportFormat,
    },
    ExportFinished {
        format: ExportFormat,
        count: usize,
        at: DateTime<Utc>,
    },
    ExportFailed {
        format: ExportFormat,
        at: DateTime<Utc>,
    },
}

/// Blank form fields arrive as `""`; treat them as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Applies `action` to `state`, returning the next state.
///
/// Any change to what is being aggregated clears the drill-down selection,
/// since the selected cell may no longer exist.
pub fn reduce(state: &DashboardState, action: Action) -> DashboardState {
    let mut next = state.clone();
    match action {
        Action::SetRangeMode { mode } => {
            next.range.mode = mode;
            next.selected_cell = None;
        }
        Action::SetCustomRange { start, end } => {
            next.range = TimeRangeFilter::custom(start, end);
            next.selected_cell = None;
        }
        Action::ToggleActivityType { activity_type } => {
            let types = &mut next.dimensions.activity_types;
            if !types.remove(&activity_type) {
                types.insert(activity_type);
            }
            next.selected_cell = None;
        }
        Action::ToggleStatus { status } => {
            let statuses = &mut next.dimensions.statuses;
            if !statuses.remove(&status) {
                statuses.insert(status);
            }
            next.selected_cell = None;
        }
        Action::ToggleQuickStat { quick_stat } => {
            next.dimensions.quick_stat = if state.dimensions.quick_stat == Some(quick_stat) {
                None
            } else {
                Some(quick_stat)
            };
            next.selected_cell = None;
        }
        Action::ClearFilters => {
            next.dimensions = DimensionFilter::default();
            next.range = TimeRangeFilter::default();
            next.selected_cell = None;
        }
        Action::SetGranularity { granularity } => {
            next.bucketing.granularity = granularity;
            next.selected_cell = None;
        }
        Action::SetWeekStart { week_start } => {
            next.bucketing.week_start = week_start;
            next.selected_cell = None;
        }
        Action::SetView { view } => next.view = view,
        Action::SetTab { tab } => next.tab = tab,
        Action::SelectCell {
            activity_type,
            period,
        } => {
            next.selected_cell = Some(CellRef {
                activity_type,
                period,
            });
        }
        Action::CloseDetail => next.selected_cell = None,
        Action::ToggleLiveUpdates => next.live_updates = !state.live_updates,
        Action::Tick { at } => next.last_update = at,
        Action::Notify { level, message, at } => next.push_notification(level, message, at),
        Action::DismissNotification { id } => next.notifications.retain(|n| n.id != id),
        Action::ExportStarted { format } => next.exporting.push(format),
        Action::ExportFinished { format, count, at } => {
            next.finish_export(format);
            next.push_notification(
                NotificationLevel::Success,
                format!("Exported {count} events as {}", format_name(format)),
                at,
            );
        }
        Action::ExportFailed { format, at } => {
            next.finish_export(format);
            next.push_notification(
                NotificationLevel::Warning,
                format!("{} export failed", format_name(format)),
                at,
            );
        }
    }
    next
}

fn format_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "CSV",
        ExportFormat::Json => "JSON",
    }
}
