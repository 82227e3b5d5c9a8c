use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

/// Entry point for form-submission events.
///
/// Ignored forms and spam get the same 200 as real leads; only faults that
/// the form host should retry answer 500. Body extraction failures, an
/// oversized body included, answer 500 as well.
pub async fn ingest(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::MalformedInput("Request body too large".to_string())
        } else {
            AppError::MalformedInput(rejection.body_text())
        }
    })?;
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let submission = parser::parse_body(content_type, &body)?;
    let result = state.pipeline.run(submission).await?;

    if let pipeline::PipelineResult::Processed(report) = &result {
        tracing::debug!(
            "Submission {} processed with score {}",
            report.submission_id,
            report.score
        );
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "message": result.message() })),
    )
        .into_response())
}
