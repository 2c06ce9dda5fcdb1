use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::state::AppState;
use crate::store::EventStore;

mod background;
mod charts;
mod config;
mod dashboard_config;
mod paths;
mod routes;
mod state;
mod store;
mod styles;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_tracing!()?;
    let env = shared::load_env_config!()?;

    let config = dashboard_config::load(&env.config_path)
        .with_context(|| format!("Failed to load {}", env.config_path.display()))?;
    let store = EventStore::load(&config.dataset)?;
    let bind = config.bind.clone();
    let state = Arc::new(AppState::new(store, config));

    background::spawn_background_workers(&state);

    // Fragment routes: /fragments/*
    let fragment_routes = Router::new()
        .route("/dashboard", get(views::dashboard::fragment_dashboard))
        .route("/cell", get(views::detail::fragment_cell));

    // JSON views of the current aggregation: /api/*
    let api_routes = Router::new()
        .route("/buckets", get(routes::api_buckets))
        .route("/grid", get(routes::api_grid))
        .route("/summary", get(routes::api_summary));

    let app = Router::new()
        .route("/", get(views::index))
        .route("/styles.css", get(views::styles))
        .route("/actions", post(routes::apply_action))
        .route("/export/csv", get(routes::export_csv))
        .route("/export/json", get(routes::export_json))
        .nest("/fragments", fragment_routes)
        .nest("/api", api_routes)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {bind}"))?;
    info!("Dashboard listening on {bind}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
