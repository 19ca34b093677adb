//! JSON envelope for `/api/summarize`: `{ "data": ..., "meta": ... }`.

use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

use super::models::{SummarizeResponse, SummaryOutcome};

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: &'static str,
    pub status_code: u16,
    /// Failure tag such as `retrieval_failed`; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub timestamp: String,
    pub message: Option<String>,
}

pub type Reply = (StatusCode, Json<ApiResponse<SummarizeResponse>>);

pub fn success(data: SummarizeResponse) -> Reply {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta {
                status: "success",
                status_code: StatusCode::OK.as_u16(),
                code: None,
                timestamp: Utc::now().to_rfc3339(),
                message: None,
            },
        }),
    )
}

/// Maps a failed outcome to its status code and the same text the form page shows.
pub fn failure(outcome: &SummaryOutcome) -> Reply {
    let (status, message) = match outcome {
        SummaryOutcome::RetrievalFailed(_) => (
            StatusCode::BAD_REQUEST,
            outcome.error_text().map(str::to_string),
        ),
        SummaryOutcome::NoContent => (StatusCode::UNPROCESSABLE_ENTITY, outcome.summary_text()),
        SummaryOutcome::SummarizationFailed(_) => (StatusCode::BAD_GATEWAY, outcome.summary_text()),
        SummaryOutcome::Success { .. } => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };

    (
        status,
        Json(ApiResponse {
            data: None,
            meta: ResponseMeta {
                status: "error",
                status_code: status.as_u16(),
                code: outcome.error_code(),
                timestamp: Utc::now().to_rfc3339(),
                message,
            },
        }),
    )
}
