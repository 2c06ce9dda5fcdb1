use activity_engine::{Grid, Status, TimeBucket};
use maud::{Markup, html};
use serde_json::json;

use super::{cell_opacity, format_trend, status_color};

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 240.0;
const MARGIN_LEFT: f64 = 110.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 30.0;
const ROW_HEIGHT: f64 = 26.0;

const TEXT_STYLE: &str = "fill: var(--foreground); font-family: inherit";
const SVG_CONTAINER_STYLE: &str = "width:100%;height:auto";

/// Stack order, bottom to top.
const STACK: [Status; 3] = [Status::Success, Status::Warning, Status::Fail];

/// Activity type by period heatmap. Placeholder cells are not drawn; occupied
/// cells post a drill-down selection when clicked.
pub fn render_heatmap(grid: &Grid<'_>, title: &str) -> Markup {
    if grid.is_empty() {
        return empty_chart(title);
    }

    let chart_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_h = ROW_HEIGHT * grid.rows.len() as f64;
    let total_h = MARGIN_TOP + chart_h + MARGIN_BOTTOM;
    let cell_w = chart_w / grid.periods.len().max(1) as f64;
    let labels: Vec<&str> = grid.periods.iter().map(|p| p.period_label.as_str()).collect();

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {total_h}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(total_h) style="fill: var(--background)" {}
            text x=(MARGIN_LEFT) y="14" font-size="12" style=(TEXT_STYLE) { (title) }
            @for (row_idx, row) in grid.rows.iter().enumerate() {
                @let y = MARGIN_TOP + row_idx as f64 * ROW_HEIGHT;
                text x=(MARGIN_LEFT - 6.0) y=(y + ROW_HEIGHT * 0.65) font-size="11" text-anchor="end" style=(TEXT_STYLE) {
                    (row.activity_type)
                }
                @for (col_idx, cell) in row.cells.iter().enumerate() {
                    @if let Some(status) = cell.dominant_status {
                        @let x = MARGIN_LEFT + col_idx as f64 * cell_w;
                        rect x=(x) y=(y + 1.0) width=((cell_w - 1.0).max(0.5)) height=(ROW_HEIGHT - 2.0)
                            opacity=(format!("{:.2}", cell_opacity(cell.intensity)))
                            style=(format!("fill: {}; cursor: pointer", status_color(status)))
                            hx-post="/actions"
                            hx-vals=(json!({
                                "type": "select_cell",
                                "activity_type": cell.activity_type,
                                "period": cell.period.key(),
                            }).to_string())
                            hx-target="#dashboard"
                            hx-swap="innerHTML"
                        {
                            title {
                                (cell.activity_type) " · " (cell.period_label) ": "
                                (cell.count) " events (" (status.as_str()) ")"
                            }
                        }
                    }
                }
            }
            (write_x_axis(&labels, chart_w, total_h - 5.0))
        }
    }
}

/// One bar per bucket with success, warning and fail stacked.
pub fn render_stacked_bar(buckets: &[TimeBucket], title: &str) -> Markup {
    if buckets.is_empty() {
        return empty_chart(title);
    }

    let max_val = buckets.iter().map(|b| b.total).max().unwrap_or(0).max(1) as f64;

    let chart_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bar_w = chart_w / buckets.len() as f64;
    let labels: Vec<&str> = buckets.iter().map(|b| b.period_label.as_str()).collect();

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            text x=(MARGIN_LEFT) y="14" font-size="12" style=(TEXT_STYLE) { (title) }
            text x=(MARGIN_LEFT - 5.0) y=(MARGIN_TOP + 10.0) font-size="10" text-anchor="end" style=(TEXT_STYLE) {
                (max_val)
            }
            text x=(MARGIN_LEFT - 5.0) y=(MARGIN_TOP + chart_h) font-size="10" text-anchor="end" style=(TEXT_STYLE) { "0" }
            @for (i, bucket) in buckets.iter().enumerate() {
                @let x = MARGIN_LEFT + i as f64 * bar_w;
                g {
                    title {
                        (bucket.period_label) ": " (bucket.total) " events "
                        (bucket.trend_direction.arrow()) " " (format_trend(bucket.trend_percent))
                    }
                    @for (status, y, h) in stack_segments(bucket, max_val, chart_h) {
                        rect x=(x) y=(y) width=((bar_w - 1.0).max(0.5)) height=(h) opacity="0.85"
                            style=(format!("fill: {}", status_color(status))) {}
                    }
                }
            }
            (write_x_axis(&labels, chart_w, HEIGHT - 5.0))
        }
    }
}

/// `(status, y, height)` for each non-empty segment of a bar.
fn stack_segments(bucket: &TimeBucket, max_val: f64, chart_h: f64) -> Vec<(Status, f64, f64)> {
    let mut baseline = MARGIN_TOP + chart_h;
    let mut segments = Vec::new();
    for status in STACK {
        let count = bucket.counts.get(status);
        if count == 0 {
            continue;
        }
        let h = count as f64 / max_val * chart_h;
        baseline -= h;
        segments.push((status, baseline, h));
    }
    segments
}

fn write_x_axis(labels: &[&str], chart_w: f64, label_y: f64) -> Markup {
    html! {
        @if let Some(first) = labels.first() {
            text x=(MARGIN_LEFT) y=(label_y) font-size="11" text-anchor="start" style=(TEXT_STYLE) {
                (first)
            }
        }
        @if labels.len() > 2 {
            @let mid_x = MARGIN_LEFT + chart_w / 2.0;
            text x=(mid_x) y=(label_y) font-size="11" text-anchor="middle" style=(TEXT_STYLE) {
                (labels[labels.len() / 2])
            }
        }
        @if labels.len() > 1 {
            @let end_x = MARGIN_LEFT + chart_w;
            text x=(end_x) y=(label_y) font-size="11" text-anchor="end" style=(TEXT_STYLE) {
                (labels[labels.len() - 1])
            }
        }
    }
}

fn empty_chart(title: &str) -> Markup {
    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            text x=(WIDTH / 2.0) y=(HEIGHT / 2.0) font-size="14" text-anchor="middle" style=(TEXT_STYLE) {
                (title) ": no activity for the current filters"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use activity_engine::{ActivityEvent, Bucketing, Granularity, parse_events};

    use super::*;

    fn events() -> Vec<ActivityEvent> {
        parse_events(
            r#"[
            {"activityType": "Login", "status": "success", "user": "a", "device": "d",
             "date": "2025-01-01", "timestamp": "2025-01-01T10:00:00Z"},
            {"activityType": "Login", "status": "fail", "user": "b", "device": "d",
             "date": "2025-01-01", "timestamp": "2025-01-01T11:00:00Z"},
            {"activityType": "Upload", "status": "warning", "user": "c", "device": "d",
             "date": "2025-01-03", "timestamp": "2025-01-03T10:00:00Z"}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_heatmap_draws_only_occupied_cells() {
        let events = events();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let grid = Bucketing::new(Granularity::Daily).grid(&refs);

        let svg = render_heatmap(&grid, "activity").into_string();

        assert_eq!(svg.matches("select_cell").count(), 2);
        assert!(svg.contains("var(--status-fail)"));
        assert!(svg.contains("var(--status-warning)"));
        assert!(svg.contains(">Upload<"));
    }

    #[test]
    fn test_stacked_segments_sum_to_bar_height() {
        let events = events();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let buckets = Bucketing::new(Granularity::Daily).buckets(&refs);
        let chart_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        let segments = stack_segments(&buckets[0], 2.0, chart_h);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].0, Status::Success);
        assert_eq!(segments[1].0, Status::Fail);
        let height: f64 = segments.iter().map(|s| s.2).sum();
        assert!((height - chart_h).abs() < 1e-9);
        assert!(stack_segments(&buckets[1], 2.0, chart_h).is_empty());
    }

    #[test]
    fn test_empty_inputs_render_empty_state() {
        let grid = Bucketing::new(Granularity::Daily).grid(&[]);
        assert!(render_heatmap(&grid, "activity").into_string().contains("no activity"));
        assert!(render_stacked_bar(&[], "activity").into_string().contains("no activity"));
    }
}
