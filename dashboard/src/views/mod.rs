use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use maud::{DOCTYPE, Markup, html};

use crate::state::AppState;
use crate::styles;

pub mod controls;
pub mod dashboard;
pub mod detail;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";
const HTMX_JSON_ENC_SRC: &str = "https://unpkg.com/htmx-ext-json-enc@2.0.1/json-enc.js";

pub fn page_shell(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/styles.css";
                script src=(HTMX_SRC) {}
                script src=(HTMX_JSON_ENC_SRC) {}
            }
            body hx-ext="json-enc" {
                (content)
            }
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Markup {
    page_shell("Activity | Dashboard", dashboard::render_page(&state))
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], styles::ALL.as_str())
}
