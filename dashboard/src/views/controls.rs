use activity_engine::{
    ChartView, DashboardState, ExportFormat, Granularity, QuickStat, RangeMode, Status,
    SummaryStats, Tab, WeekStart,
};
use maud::{Markup, html};
use serde_json::{Value, json};

use crate::styles::Controls as ControlClass;

/// Button that posts `vals` as an action and swaps in the refreshed dashboard.
pub fn action_button(label: &str, vals: Value, active: bool) -> Markup {
    html! {
        button.(ControlClass::TOGGLE_BTN)
            .(if active { ControlClass::TOGGLE_ACTIVE } else { "" })
            hx-post="/actions"
            hx-vals=(vals.to_string())
            hx-target="#dashboard"
            hx-swap="innerHTML"
        {
            (label)
        }
    }
}

pub fn render_kpis(summary: &SummaryStats, ui: &DashboardState) -> Markup {
    let cards = [
        (QuickStat::Total, "total events", summary.total.to_string()),
        (
            QuickStat::Success,
            "success",
            format!("{} ({}%)", summary.counts.success, summary.success_rate),
        ),
        (QuickStat::Warning, "warnings", summary.counts.warning.to_string()),
        (QuickStat::Failed, "failed", summary.counts.fail.to_string()),
    ];

    html! {
        div.(ControlClass::KPI_ROW) {
            @for (quick_stat, label, value) in &cards {
                @let active = ui.dimensions.quick_stat == Some(*quick_stat);
                button.(ControlClass::KPI_CARD)
                    .(if active { ControlClass::KPI_ACTIVE } else { "" })
                    hx-post="/actions"
                    hx-vals=(json!({ "type": "toggle_quick_stat", "quick_stat": quick_stat }).to_string())
                    hx-target="#dashboard"
                    hx-swap="innerHTML"
                {
                    div.(ControlClass::KPI_VALUE) { (value) }
                    div.(ControlClass::KPI_LABEL) { (label) }
                }
            }
        }
        div.(ControlClass::KPI_LABEL) {
            (summary.unique_users) " users · " (summary.unique_devices) " devices"
        }
    }
}

pub fn render_toolbar(ui: &DashboardState, activity_types: &[&str]) -> Markup {
    html! {
        div.(ControlClass::TOOLBAR) {
            (render_range_selector(ui))
            (render_custom_range(ui))
        }
        div.(ControlClass::TOOLBAR) {
            div.(ControlClass::CONTROL_GROUP) {
                span.(ControlClass::CONTROL_LABEL) { "type:" }
                @for activity_type in activity_types {
                    (action_button(
                        activity_type,
                        json!({ "type": "toggle_activity_type", "activity_type": activity_type }),
                        ui.dimensions.activity_types.contains(*activity_type),
                    ))
                }
            }
            div.(ControlClass::CONTROL_GROUP) {
                span.(ControlClass::CONTROL_LABEL) { "status:" }
                @for status in Status::ALL {
                    (action_button(
                        status.as_str(),
                        json!({ "type": "toggle_status", "status": status }),
                        ui.dimensions.statuses.contains(&status),
                    ))
                }
            }
            @if !ui.dimensions.is_empty() || ui.range.mode != RangeMode::All {
                (action_button("[clear]", json!({ "type": "clear_filters" }), false))
            }
        }
        div.(ControlClass::TOOLBAR) {
            div.(ControlClass::CONTROL_GROUP) {
                span.(ControlClass::CONTROL_LABEL) { "bucket:" }
                @for granularity in Granularity::ALL {
                    (action_button(
                        granularity.display_name(),
                        json!({ "type": "set_granularity", "granularity": granularity }),
                        ui.bucketing.granularity == granularity,
                    ))
                }
            }
            @if ui.bucketing.granularity == Granularity::Weekly {
                div.(ControlClass::CONTROL_GROUP) {
                    span.(ControlClass::CONTROL_LABEL) { "week starts:" }
                    @for (label, week_start) in [("sun", WeekStart::Sunday), ("mon", WeekStart::Monday)] {
                        (action_button(
                            label,
                            json!({ "type": "set_week_start", "week_start": week_start }),
                            ui.bucketing.week_start == week_start,
                        ))
                    }
                }
            }
            div.(ControlClass::CONTROL_GROUP) {
                span.(ControlClass::CONTROL_LABEL) { "view:" }
                (action_button(
                    "heatmap",
                    json!({ "type": "set_view", "view": ChartView::Heatmap }),
                    ui.view == ChartView::Heatmap,
                ))
                (action_button(
                    "stacked bars",
                    json!({ "type": "set_view", "view": ChartView::StackedBar }),
                    ui.view == ChartView::StackedBar,
                ))
            }
            (render_export_links(ui))
        }
    }
}

fn render_range_selector(ui: &DashboardState) -> Markup {
    html! {
        div.(ControlClass::CONTROL_GROUP) {
            span.(ControlClass::CONTROL_LABEL) { "range:" }
            @for mode in RangeMode::PRESETS {
                (action_button(
                    mode.display_name(),
                    json!({ "type": "set_range_mode", "mode": mode }),
                    ui.range.mode == mode,
                ))
            }
        }
    }
}

fn render_custom_range(ui: &DashboardState) -> Markup {
    let fmt = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    let active = ui.range.mode == RangeMode::Custom;
    html! {
        form.(ControlClass::CUSTOM_RANGE)
            hx-post="/actions"
            hx-target="#dashboard"
            hx-swap="innerHTML"
        {
            input type="hidden" name="type" value="set_custom_range";
            input type="date" name="start" value=(fmt(ui.range.custom_start));
            span { "to" }
            input type="date" name="end" value=(fmt(ui.range.custom_end));
            button.(ControlClass::TOGGLE_BTN)
                .(if active { ControlClass::TOGGLE_ACTIVE } else { "" })
                type="submit"
            { "custom" }
        }
    }
}

fn render_export_links(ui: &DashboardState) -> Markup {
    html! {
        div.(ControlClass::CONTROL_GROUP) {
            span.(ControlClass::CONTROL_LABEL) { "export:" }
            @for format in [ExportFormat::Csv, ExportFormat::Json] {
                @let label = match format {
                    ExportFormat::Csv => "csv",
                    ExportFormat::Json => "json",
                };
                @if ui.is_exporting(format) {
                    span.(ControlClass::EXPORT_BUSY) { (label) "…" }
                } @else {
                    a.(ControlClass::EXPORT_BTN) href=(format!("/export/{label}")) download { (label) }
                }
            }
        }
    }
}

pub fn render_tabs(ui: &DashboardState) -> Markup {
    html! {
        div.(crate::styles::Charts::TAB_BAR) {
            (action_button("chart", json!({ "type": "set_tab", "tab": Tab::Chart }), ui.tab == Tab::Chart))
            (action_button("events", json!({ "type": "set_tab", "tab": Tab::Events }), ui.tab == Tab::Events))
        }
    }
}
