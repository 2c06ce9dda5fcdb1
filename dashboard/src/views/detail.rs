use std::sync::Arc;

use activity_engine::{ActivityEvent, Bucketing, DashboardState, GridCell};
use axum::extract::{Query, State};
use chrono::Utc;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::json;

use crate::charts::status_color;
use crate::state::AppState;
use crate::styles::{Charts as ChartClass, Global};

use super::controls::action_button;

#[derive(Deserialize)]
pub struct CellQuery {
    activity_type: String,
    period: String,
}

/// Drill-down panel for the selected heatmap cell. Renders nothing when no
/// cell is selected.
pub fn render_detail(ui: &DashboardState, events: &[&ActivityEvent]) -> Markup {
    let Some(selected) = &ui.selected_cell else {
        return html! {};
    };

    let grid = ui.bucketing.grid(events);
    let panel = match grid.cell(&selected.activity_type, &selected.period) {
        Some(cell) if !cell.is_placeholder() => render_cell(cell),
        _ => html! {
            div.(Global::META) {
                "No events for " (selected.activity_type) " in " (selected.period) "."
            }
        },
    };

    html! {
        div.(ChartClass::DETAIL_PANEL) {
            div.(ChartClass::DETAIL_HEADER) {
                (action_button("[close]", json!({ "type": "close_detail" }), false))
            }
            (panel)
        }
    }
}

/// `GET /fragments/cell`: the events behind one cell under the current
/// filters, without changing the selection.
pub async fn fragment_cell(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CellQuery>,
) -> Markup {
    let ui = state.snapshot();
    let events = ui.filtered_events(state.store.events(), Utc::now());
    cell_panel(&ui.bucketing, &events, &query.activity_type, &query.period)
}

fn cell_panel(
    bucketing: &Bucketing,
    events: &[&ActivityEvent],
    activity_type: &str,
    period: &str,
) -> Markup {
    let grid = bucketing.grid(events);
    match grid.cell(activity_type, period) {
        Some(cell) if !cell.is_placeholder() => render_cell(cell),
        _ => html! {
            div.(ChartClass::EMPTY_STATE) { "No events for this cell." }
        },
    }
}

fn render_cell(cell: &GridCell<'_>) -> Markup {
    html! {
        h3 {
            (cell.activity_type) " · " (cell.period_label)
        }
        div.(Global::META) {
            (cell.count) " events"
            @if let Some(status) = cell.dominant_status {
                ", worst: "
                span style=(format!("color: {}", status_color(status))) { (status.as_str()) }
            }
        }
        table.(ChartClass::EVENT_TABLE) {
            thead {
                tr { th { "Time" } th { "Status" } th { "User" } th { "Device" } }
            }
            tbody {
                @for event in &cell.events {
                    tr {
                        td { (event.timestamp.format("%Y-%m-%d %H:%M").to_string()) }
                        td style=(format!("color: {}", status_color(event.status))) {
                            (event.status.as_str())
                        }
                        td { (event.user) }
                        td { (event.device) }
                    }
                }
            }
        }
    }
}
