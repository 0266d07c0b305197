use super::{AppState, SubmitReceiptBody};
use crate::error::{EcoError, InputError};
use crate::pipeline::{Decision, SubmissionRequest};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// GET /health: always 200
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// HTTP status for each terminal branch of the pipeline.
pub(super) fn decision_status(decision: &Decision) -> StatusCode {
    match decision {
        Decision::NoReceipt | Decision::InvalidReceipt => StatusCode::BAD_REQUEST,
        Decision::NotRecyclable | Decision::Rewarded => StatusCode::OK,
        Decision::ValidationRejected(_)
        | Decision::RegistrationFailed(_)
        | Decision::RegistrationUnconfirmed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_message(error: &EcoError) -> String {
    match error {
        EcoError::InvalidInput(input) => input.to_string(),
        EcoError::Classifier(classifier) => format!("Error processing image: {classifier}"),
        EcoError::Ledger(ledger) => ledger.message().to_string(),
        EcoError::Config(_) | EcoError::Other(_) => {
            "An unexpected error occurred while processing the receipt.".to_string()
        }
    }
}

pub(super) fn error_response(error: &EcoError) -> Response {
    let status = if error.is_caller_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let body = serde_json::json!({
        "message": error_message(error),
        "error": error.kind(),
    });
    (status, Json(body)).into_response()
}

fn rejection_response(rejection: &JsonRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let body = serde_json::json!({
            "message": "Request body is too large.",
            "error": "invalid_input",
        });
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
    }
    error_response(&InputError::Body(rejection.body_text()).into())
}

/// POST /submitReceipt: classify the photo and run the decision pipeline
pub(super) async fn handle_submit_receipt(
    State(state): State<AppState>,
    body: Result<Json<SubmitReceiptBody>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(%request_id, error = %rejection.body_text(), "rejected submission body");
            return rejection_response(&rejection);
        }
    };

    let request = match SubmissionRequest::new(
        body.image,
        &body.address,
        &body.device_id,
        body.utc_offset_minutes,
    ) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!(%request_id, %error, "invalid submission");
            return error_response(&error.into());
        }
    };

    tracing::info!(
        %request_id,
        address = request.address(),
        device_id = request.device_id(),
        image_chars = request.image().len(),
        "received submission"
    );

    let verdict = match classify(&state, &request).await {
        Ok(verdict) => verdict,
        Err(error) => {
            if error.is_caller_error() {
                tracing::warn!(%request_id, kind = error.kind(), %error, "submission image rejected");
            } else {
                tracing::error!(%request_id, kind = error.kind(), %error, "classification failed");
            }
            return error_response(&error);
        }
    };

    tracing::info!(
        %request_id,
        bag_type = %verdict.bag_type,
        confidence = verdict.confidence_score,
        receipt_detected = verdict.receipt_detected,
        receipt_valid = verdict.receipt_valid,
        "classified submission"
    );

    let (decision, outcome) = state.pipeline.evaluate(&request, &verdict).await;
    let status = decision_status(&decision);

    tracing::info!(
        %request_id,
        address = request.address(),
        decision = decision.as_ref(),
        eligible = outcome.eligible_for_rewards,
        status = status.as_u16(),
        "submission decided"
    );

    (status, Json(outcome)).into_response()
}

async fn classify(
    state: &AppState,
    request: &SubmissionRequest,
) -> crate::error::Result<crate::classifier::ClassificationVerdict> {
    let today = state.classifier.today(request.utc_offset_minutes())?;
    state.classifier.classify_on(request.image(), today).await
}
