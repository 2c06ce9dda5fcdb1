use std::sync::Arc;

use activity_engine::{
    ActivityEvent, ChartView, DashboardState, NotificationLevel, SummaryStats, Tab, csv_rows,
};
use axum::extract::State;
use chrono::Utc;
use maud::{Markup, html};
use serde_json::json;

use crate::charts::{status_color, svg};
use crate::config::{IDLE_POLL_SECS, MAX_TABLE_ROWS, NOTIFICATION_TTL_SECS};
use crate::state::AppState;
use crate::styles::{Charts as ChartClass, Global};

use super::{controls, detail};

pub fn render_page(state: &AppState) -> Markup {
    html! {
        div.(Global::HEADER) {
            h1 { "> activity" }
            span.(Global::META) { (state.store.events().len()) " events loaded" }
        }
        div #dashboard {
            (render_body(state))
        }
    }
}

pub async fn fragment_dashboard(State(state): State<Arc<AppState>>) -> Markup {
    render_body(&state)
}

/// Everything inside `#dashboard`, re-rendered after every action.
pub fn render_body(state: &AppState) -> Markup {
    let now = Utc::now();
    let ui = state.snapshot();
    let events = ui.filtered_events(state.store.events(), now);
    let summary = SummaryStats::from_events(&events);
    let activity_types = state.store.activity_types();

    let poll_secs = if ui.live_updates {
        state.config.live_update_secs.max(1)
    } else {
        IDLE_POLL_SECS
    };

    html! {
        div hx-get="/fragments/dashboard"
            hx-trigger=(format!("every {poll_secs}s"))
            hx-target="#dashboard"
            hx-swap="innerHTML" {}

        (render_toasts(&ui))
        (render_status_line(&ui))
        (controls::render_kpis(&summary, &ui))
        (controls::render_toolbar(&ui, &activity_types))
        (detail::render_detail(&ui, &events))
        (controls::render_tabs(&ui))

        @match ui.tab {
            Tab::Chart => { (render_chart(&ui, &events)) }
            Tab::Events => { (render_table(&events)) }
        }
    }
}

fn render_status_line(ui: &DashboardState) -> Markup {
    let live_label = if ui.live_updates { "[live: on]" } else { "[live: off]" };
    html! {
        div.(Global::META) {
            "Last update: " (ui.last_update.format("%Y-%m-%d %H:%M:%S UTC").to_string()) " "
            (controls::action_button(live_label, json!({ "type": "toggle_live_updates" }), ui.live_updates))
        }
    }
}

fn render_toasts(ui: &DashboardState) -> Markup {
    html! {
        div.(ChartClass::TOAST_STACK) {
            @for n in &ui.notifications {
                @let level_class = match n.level {
                    NotificationLevel::Success => ChartClass::TOAST_SUCCESS,
                    NotificationLevel::Warning => ChartClass::TOAST_WARNING,
                    NotificationLevel::Info => ChartClass::TOAST_INFO,
                };
                div.(ChartClass::TOAST).(level_class)
                    hx-post="/actions"
                    hx-trigger=(format!("load delay:{NOTIFICATION_TTL_SECS}s, click"))
                    hx-vals=(json!({ "type": "dismiss_notification", "id": n.id }).to_string())
                    hx-target="#dashboard"
                    hx-swap="innerHTML"
                {
                    (n.message)
                }
            }
        }
    }
}

fn render_chart(ui: &DashboardState, events: &[&ActivityEvent]) -> Markup {
    let granularity = ui.bucketing.granularity.display_name();
    let chart = match ui.view {
        ChartView::Heatmap => {
            let grid = ui.bucketing.grid(events);
            svg::render_heatmap(&grid, &format!("activity by type, {granularity}"))
        }
        ChartView::StackedBar => {
            let buckets = ui.bucketing.buckets(events);
            svg::render_stacked_bar(&buckets, &format!("activity by status, {granularity}"))
        }
    };

    html! {
        div.(ChartClass::CHART_CONTAINER) {
            (chart)
            div.(ChartClass::LEGEND) {
                @for status in activity_engine::Status::ALL {
                    span {
                        span.(ChartClass::SWATCH) style=(format!("background: {}", status_color(status))) {}
                        (status.as_str())
                    }
                }
            }
        }
    }
}

fn render_table(events: &[&ActivityEvent]) -> Markup {
    if events.is_empty() {
        return html! {
            div.(ChartClass::EMPTY_STATE) { "No events match the current filters." }
        };
    }

    let rows = csv_rows(&events[..events.len().min(MAX_TABLE_ROWS)]);
    html! {
        table.(ChartClass::EVENT_TABLE) {
            thead {
                tr {
                    th { "Date" } th { "Time" } th { "Activity" }
                    th { "Status" } th { "User" } th { "Device" }
                }
            }
            tbody {
                @for row in &rows {
                    tr {
                        td { (row.date) } td { (row.time) } td { (row.activity) }
                        td { (row.status) } td { (row.user) } td { (row.device) }
                    }
                }
            }
        }
        @if events.len() > MAX_TABLE_ROWS {
            div.(Global::META) {
                "Showing " (MAX_TABLE_ROWS) " of " (events.len()) " events. Export for the full list."
            }
        }
    }
}
