use axum::{
    extract::{Form, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use dn_view::ClickTarget;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::templates;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeForm {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub url: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissTarget {
    Close,
    Background,
}

#[derive(Debug, Deserialize)]
pub struct DismissParams {
    pub target: DismissTarget,
}

impl From<DismissTarget> for ClickTarget {
    fn from(target: DismissTarget) -> Self {
        match target {
            DismissTarget::Close => ClickTarget::CloseButton,
            DismissTarget::Background => ClickTarget::Background,
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let view = state.controller.snapshot().await;
    Html(templates::page(&view))
}

pub async fn go_to_page(State(state): State<Arc<AppState>>, Path(page): Path<u32>) -> Redirect {
    if let Err(e) = state.controller.go_to_page(page).await {
        warn!(page, error = %e, "Page load failed");
    }
    Redirect::to("/#top")
}

// Failures below are already on the status banner; the log line is for the operator.

pub async fn summarize_article(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SummarizeForm>,
) -> Redirect {
    if let Err(e) = state.controller.generate_summary(&form.url).await {
        warn!(url = %form.url, error = %e, "Summary generation failed");
    }
    Redirect::to("/")
}

pub async fn show_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Redirect {
    if let Err(e) = state.controller.show_summary(&params.url).await {
        warn!(url = %params.url, error = %e, "Cannot show summary");
    }
    Redirect::to("/")
}

pub async fn dismiss_overlay(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DismissParams>,
) -> Redirect {
    let closed = state.controller.dismiss_overlay(params.target.into()).await;
    debug!(closed, "Overlay dismissal");
    Redirect::to("/")
}

pub async fn check_new_articles(State(state): State<Arc<AppState>>) -> Redirect {
    // The delayed reload keeps running after the redirect.
    if let Err(e) = state.controller.check_new_articles().await {
        warn!(error = %e, "New article check failed");
    }
    Redirect::to("/")
}

pub async fn generate_all_summaries(State(state): State<Arc<AppState>>) -> Redirect {
    if let Err(e) = state.controller.generate_all_summaries().await {
        warn!(error = %e, "Bulk summary generation failed");
    }
    Redirect::to("/")
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Html<String> {
    let view = state.controller.snapshot().await;
    let refresh = state.controller.config().stats_interval.as_secs();
    Html(templates::stats_document(view.stats(), refresh))
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::CSS)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
