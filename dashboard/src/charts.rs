pub mod svg;

use activity_engine::Status;

/// CSS custom property that colours a status.
pub fn status_color(status: Status) -> &'static str {
    match status {
        Status::Success => "var(--status-success)",
        Status::Warning => "var(--status-warning)",
        Status::Fail => "var(--status-fail)",
    }
}

/// Heatmap fill opacity: faint cells stay visible, the row peak is opaque.
pub fn cell_opacity(intensity: f64) -> f64 {
    0.25 + 0.75 * intensity.clamp(0.0, 1.0)
}

pub fn format_trend(percent: i64) -> String {
    if percent > 0 {
        format!("+{percent}%")
    } else {
        format!("{percent}%")
    }
}
