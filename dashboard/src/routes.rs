use std::sync::Arc;
use std::time::Duration;

use activity_engine::{
    Action, EngineError, ExportEnvelope, ExportFormat, SummaryStats, TimeBucket, to_csv,
};
use axum::extract::{Json, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use maud::Markup;
use tracing::{debug, error, info};

use crate::state::AppState;
use crate::views::dashboard::render_body;

/// Actions only the server itself may dispatch.
fn is_internal(action: &Action) -> bool {
    matches!(
        action,
        Action::Tick { .. }
            | Action::Notify { .. }
            | Action::ExportStarted { .. }
            | Action::ExportFinished { .. }
            | Action::ExportFailed { .. }
    )
}

pub async fn apply_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<Action>,
) -> Result<Markup, StatusCode> {
    if is_internal(&action) {
        return Err(StatusCode::BAD_REQUEST);
    }
    debug!("Applying {action:?}");

    if action == Action::ToggleLiveUpdates {
        // Flag and timer change together; lock order is live, then ui.
        let mut live = state.live.lock().unwrap();
        let next = state.dispatch(action);
        live.sync(&state, next.live_updates);
    } else {
        state.dispatch(action);
    }

    Ok(render_body(&state))
}

pub async fn api_buckets(State(state): State<Arc<AppState>>) -> Json<Vec<TimeBucket>> {
    let ui = state.snapshot();
    let events = ui.filtered_events(state.store.events(), Utc::now());
    Json(ui.bucketing.buckets(&events))
}

pub async fn api_grid(State(state): State<Arc<AppState>>) -> Response {
    let ui = state.snapshot();
    let events = ui.filtered_events(state.store.events(), Utc::now());
    Json(ui.bucketing.grid(&events)).into_response()
}

pub async fn api_summary(State(state): State<Arc<AppState>>) -> Json<SummaryStats> {
    let ui = state.snapshot();
    let events = ui.filtered_events(state.store.events(), Utc::now());
    Json(SummaryStats::from_events(&events))
}

pub async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    export(state, ExportFormat::Csv).await
}

pub async fn export_json(State(state): State<Arc<AppState>>) -> Response {
    export(state, ExportFormat::Json).await
}

/// Finished payload of one export run.
struct ExportOutput {
    body: String,
    at: DateTime<Utc>,
}

async fn export(state: Arc<AppState>, format: ExportFormat) -> Response {
    state.dispatch(Action::ExportStarted { format });

    // The run owns the finished/failed dispatch, so the in-flight marker is
    // cleared even when the client goes away mid-delay.
    let run = tokio::spawn(run_export(Arc::clone(&state), format));

    match run.await {
        Ok(Ok(output)) => (
            [
                (header::CONTENT_TYPE, format.content_type().to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", format.file_name(output.at)),
                ),
            ],
            output.body,
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("Export as {format:?} failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            error!("Export task for {format:?} did not complete: {e}");
            state.dispatch(Action::ExportFailed {
                format,
                at: Utc::now(),
            });
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn run_export(
    state: Arc<AppState>,
    format: ExportFormat,
) -> Result<ExportOutput, EngineError> {
    tokio::time::sleep(Duration::from_millis(state.config.export_delay_ms)).await;

    let now = Utc::now();
    let ui = state.snapshot();
    let events = ui.filtered_events(state.store.events(), now);

    let payload = match format {
        ExportFormat::Csv => to_csv(&events),
        ExportFormat::Json => {
            ExportEnvelope::new(&events, &ui.range, &ui.dimensions, now).to_json()
        }
    };

    match payload {
        Ok(body) => {
            state.dispatch(Action::ExportFinished {
                format,
                count: events.len(),
                at: now,
            });
            info!("Exported {} events as {format:?}", events.len());
            Ok(ExportOutput { body, at: now })
        }
        Err(e) => {
            state.dispatch(Action::ExportFailed { format, at: now });
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use activity_engine::{ActivityEvent, RangeMode, parse_events};

    use super::*;
    use crate::dashboard_config::DashboardConfig;
    use crate::store::EventStore;

    fn events() -> Vec<ActivityEvent> {
        parse_events(
            r#"[
            {"activityType": "Login", "status": "success", "user": "a", "device": "d",
             "date": "2025-01-01", "timestamp": "2025-01-01T10:00:00Z"},
            {"activityType": "Upload", "status": "fail", "user": "b", "device": "d",
             "date": "2025-01-02", "timestamp": "2025-01-02T10:00:00Z"}
        ]"#,
        )
        .unwrap()
    }

    fn app() -> Arc<AppState> {
        let config = DashboardConfig {
            default_range: RangeMode::All,
            export_delay_ms: 0,
            ..Default::default()
        };
        Arc::new(AppState::new(EventStore::new(events()), config))
    }

    #[test]
    fn test_internal_actions_are_rejected() {
        assert!(is_internal(&Action::Tick { at: Utc::now() }));
        assert!(is_internal(&Action::ExportStarted {
            format: ExportFormat::Csv
        }));
        assert!(!is_internal(&Action::ClearFilters));
        assert!(!is_internal(&Action::ToggleLiveUpdates));
    }

    #[tokio::test]
    async fn test_apply_action_rejects_tick() {
        let result = apply_action(State(app()), Json(Action::Tick { at: Utc::now() })).await;
        assert!(matches!(result, Err(StatusCode::BAD_REQUEST)));
    }

    #[tokio::test]
    async fn test_toggle_live_updates_starts_and_stops_timer() {
        let state = app();

        apply_action(State(Arc::clone(&state)), Json(Action::ToggleLiveUpdates))
            .await
            .unwrap();
        assert!(state.live.lock().unwrap().is_running());

        apply_action(State(Arc::clone(&state)), Json(Action::ToggleLiveUpdates))
            .await
            .unwrap();
        assert!(!state.live.lock().unwrap().is_running());
    }

    #[tokio::test]
    async fn test_export_notifies_and_clears_progress() {
        let state = app();

        let response = export(Arc::clone(&state), ExportFormat::Csv).await;

        assert_eq!(response.status(), StatusCode::OK);
        let ui = state.snapshot();
        assert!(ui.exporting.is_empty());
        assert_eq!(ui.notifications[0].message, "Exported 2 events as CSV");
    }

    #[tokio::test]
    async fn test_abandoned_export_still_clears_progress() {
        let config = DashboardConfig {
            default_range: RangeMode::All,
            export_delay_ms: 200,
            ..Default::default()
        };
        let state = Arc::new(AppState::new(EventStore::new(events()), config));

        let request = tokio::spawn(export_csv(State(Arc::clone(&state))));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(state.snapshot().is_exporting(ExportFormat::Csv));
        request.abort();

        tokio::time::sleep(Duration::from_millis(300)).await;

        let ui = state.snapshot();
        assert!(ui.exporting.is_empty());
        assert_eq!(ui.notifications[0].message, "Exported 2 events as CSV");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_live_toggles_keep_timer_in_step() {
        let state = app();

        let toggles: Vec<_> = (0..9)
            .map(|_| {
                tokio::spawn(apply_action(
                    State(Arc::clone(&state)),
                    Json(Action::ToggleLiveUpdates),
                ))
            })
            .collect();
        for toggle in toggles {
            toggle.await.unwrap().unwrap();
        }

        let live = state.snapshot().live_updates;
        assert!(live);
        assert_eq!(state.live.lock().unwrap().is_running(), live);
    }
}
