//! Route handlers.

use super::AppState;
use crate::provisioning::domain::TaskRequest;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use serde_json::json;
use tracing::{error, info, warn};

/// Message returned for faults outside task processing.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Describes the service and its endpoints.
pub async fn service_banner() -> impl IntoResponse {
    Json(json!({
        "message": "Pagesmith task provisioning API",
        "status": "active",
        "endpoints": {
            "process": "POST /",
            "health": "GET /health"
        }
    }))
}

/// Reports liveness with the current time.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = state.clock.utc().to_rfc3339_opts(SecondsFormat::Millis, true);
    Json(json!({ "status": "healthy", "timestamp": timestamp }))
}

/// Runs a submitted task through the provisioning pipeline.
///
/// Processing failures, including well-formed JSON with missing or mistyped
/// fields and bodies not declared as JSON, answer `200` with
/// `success: false`. JSON that cannot be parsed answers `500`.
pub async fn process_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::JsonDataError(rejection)) => {
            warn!(error = %rejection.body_text(), "task request failed validation");
            return failure(&rejection.body_text());
        }
        Err(JsonRejection::MissingJsonContentType(rejection)) => {
            warn!(error = %rejection.body_text(), "task request is not declared as JSON");
            return failure(&rejection.body_text());
        }
        Err(rejection) => {
            error!(error = %rejection.body_text(), "unreadable task request");
            return internal_error();
        }
    };

    info!(
        task = %request.task,
        round = request.round,
        attachments = request.attachments.len(),
        "received task request"
    );
    match state.processor.process(request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Task processed successfully",
                "data": result
            })),
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "task processing failed");
            failure(&err.to_string())
        }
    }
}

fn failure(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Builds the `500` response used for unexpected faults.
#[must_use]
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
