use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::bucketing::Bucketing;
use crate::event::{ActivityEvent, Status};
use crate::granularity::Period;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodHeader {
    pub period: Period,
    pub period_label: String,
}

/// One (activity type, period) cell of the heatmap.
///
/// Cells without events are kept so every row has the same width, but they
/// have no dominant status and are not drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell<'a> {
    pub activity_type: String,
    pub period: Period,
    pub period_label: String,
    pub dominant_status: Option<Status>,
    pub events: Vec<&'a ActivityEvent>,
    pub count: usize,
    /// `count` over the row's peak count, floored at 1.
    pub intensity: f64,
}

impl GridCell<'_> {
    pub fn is_placeholder(&self) -> bool {
        self.dominant_status.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow<'a> {
    pub activity_type: String,
    pub peak: usize,
    pub cells: Vec<GridCell<'a>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grid<'a> {
    pub periods: Vec<PeriodHeader>,
    pub rows: Vec<GridRow<'a>>,
}

impl<'a> Grid<'a> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, activity_type: &str, period_key: &str) -> Option<&GridCell<'a>> {
        self.rows
            .iter()
            .find(|r| r.activity_type == activity_type)?
            .cells
            .iter()
            .find(|c| c.period.key() == period_key)
    }

    /// Cells with at least one event, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = &GridCell<'a>> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| !c.is_placeholder())
    }
}

impl Bucketing {
    /// Builds the activity-type by period heatmap over the same period series
    /// that [`Bucketing::buckets`] uses.
    pub fn grid<'a>(&self, events: &[&'a ActivityEvent]) -> Grid<'a> {
        let strategy = self.strategy();
        let periods = strategy.periods(events);

        let mut by_type: BTreeMap<&str, HashMap<Period, Vec<&'a ActivityEvent>>> = BTreeMap::new();
        for &event in events {
            by_type
                .entry(event.activity_type.as_str())
                .or_default()
                .entry(strategy.period_of(event))
                .or_default()
                .push(event);
        }

        let rows: Vec<GridRow<'a>> = by_type
            .into_iter()
            .map(|(activity_type, mut cells_by_period)| {
                let peak = cells_by_period.values().map(Vec::len).max().unwrap_or(0);
                let denominator = peak.max(1) as f64;
                let cells = periods
                    .iter()
                    .map(|&period| {
                        let events = cells_by_period.remove(&period).unwrap_or_default();
                        let count = events.len();
                        GridCell {
                            activity_type: activity_type.to_owned(),
                            period,
                            period_label: period.label(),
                            dominant_status: Status::dominant(events.iter().map(|e| e.status)),
                            events,
                            count,
                            intensity: count as f64 / denominator,
                        }
                    })
                    .collect();
                GridRow {
                    activity_type: activity_type.to_owned(),
                    peak,
                    cells,
                }
            })
            .collect();

        debug!(
            "built {}x{} {} grid",
            rows.len(),
            periods.len(),
            self.granularity.display_name()
        );

        Grid {
            periods: periods
                .iter()
                .map(|p| PeriodHeader {
                    period: *p,
                    period_label: p.label(),
                })
                .collect(),
            rows,
        }
    }
}
