//! Axum HTTP gateway for receipt submissions.
//!
//! Routes:
//! - `POST /submitReceipt` and `POST /api/submitReceipt`: classify, decide, respond
//! - `GET /health`: liveness
//!
//! The router carries a request body limit, a whole-request timeout (408)
//! and an optional CORS allow-list.

mod handlers;
mod server;

pub use server::{build_app, build_state, is_public_bind, run_gateway, run_gateway_with_listener};

use crate::classifier::ReceiptClassifier;
use crate::pipeline::SubmissionPipeline;
use serde::Deserialize;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub classifier: ReceiptClassifier,
    pub pipeline: SubmissionPipeline,
}

impl AppState {
    pub fn new(classifier: ReceiptClassifier, pipeline: SubmissionPipeline) -> Self {
        Self {
            classifier,
            pipeline,
        }
    }
}

/// `POST /submitReceipt` body. Unknown fields are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceiptBody {
    pub image: String,
    pub address: String,
    #[serde(rename = "deviceID", alias = "deviceId")]
    pub device_id: String,
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}
