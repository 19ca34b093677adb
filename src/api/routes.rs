use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State},
    response::{Html, IntoResponse},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use chrono::Utc;
use std::time::Instant;

use crate::api::models::{SummarizeForm, SummarizeRequest, SummarizeResponse, SummaryOutcome};
use crate::api::page::{self, PageView};
use crate::api::response;
use crate::scraper::{extract_text, truncate_chars};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_form).post(index_submit))
        .route("/api/summarize", post(api_summarize))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_form() -> Html<String> {
    Html(page::render(&PageView::default()))
}

async fn index_submit(
    State(state): State<AppState>,
    Form(form): Form<SummarizeForm>,
) -> Html<String> {
    let url = form.url.unwrap_or_default();
    let outcome = summarize_url(&state, &url).await;

    Html(page::render(&PageView::from_outcome(&url, &outcome)))
}

async fn api_summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    let outcome = summarize_url(&state, &req.url).await;

    match &outcome {
        SummaryOutcome::Success { summary, input_chars } => response::success(SummarizeResponse {
            url: req.url,
            summary: summary.clone(),
            summarized_at: Utc::now(),
            input_chars: *input_chars,
            model: state.summarizer.model_name().to_string(),
        }),
        _ => response::failure(&outcome),
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.summarizer.model_name(),
    }))
}

/// Runs the whole pipeline for one URL. Failures never escape as errors;
/// each one becomes an outcome variant the presentation layer can map.
pub async fn summarize_url(state: &AppState, url: &str) -> SummaryOutcome {
    tracing::info!(url, "processing summarize request");
    let start_time = Instant::now();

    let html = match state.fetcher.fetch(url).await {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(url, error = %err, "could not retrieve page");
            return SummaryOutcome::RetrievalFailed(err.to_string());
        }
    };

    let text = match extract_text(&html) {
        Some(text) => text,
        None => {
            tracing::info!(url, "page has no usable paragraph text");
            return SummaryOutcome::NoContent;
        }
    };

    let input = truncate_chars(&text, state.max_input_chars);
    let input_chars = input.chars().count();
    tracing::debug!(
        url,
        extracted = text.chars().count(),
        input = input_chars,
        "text extracted"
    );

    let outcome = match state.summarizer.summarize(input).await {
        Ok(summary) => SummaryOutcome::Success { summary, input_chars },
        Err(err) => {
            tracing::warn!(url, error = %err, "summarization failed");
            SummaryOutcome::SummarizationFailed(err.to_string())
        }
    };

    tracing::info!(url, elapsed = ?start_time.elapsed(), "request processed");
    outcome
}
