use crate::support::{
    ADDRESS, FixedLedger, FixedVision, GatewayTestServer, png_data_url, stub_state,
    stub_state_with_ledger_timeout, submission, verdict_json,
};
use ecoearn::config::GatewayConfig;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

async fn start(vision: &Arc<FixedVision>, ledger: &Arc<FixedLedger>) -> GatewayTestServer {
    GatewayTestServer::start(
        stub_state(vision.clone(), ledger.clone()),
        GatewayConfig::default(),
    )
    .await
}

async fn post_json(server: &GatewayTestServer, path: &str, body: &Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(server.url(path))
        .json(body)
        .send()
        .await
        .expect("submission request should complete");
    let status = response.status();
    let body = response
        .json()
        .await
        .expect("submission response should be json");
    (status, body)
}

#[tokio::test]
async fn health_reports_healthy_with_timestamp() {
    let vision = Arc::new(FixedVision::answering("{}"));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let response = reqwest::get(server.url("/health"))
        .await
        .expect("health request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("health should be json");
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));
}

#[tokio::test]
async fn recyclable_bag_with_valid_receipt_is_rewarded() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Submission accepted! You earned rewards.");
    assert_eq!(body["bagType"], "recyclable");
    assert_eq!(body["receiptDetected"], true);
    assert_eq!(body["receiptValid"], true);
    assert_eq!(body["eligibleForRewards"], true);
    assert_eq!(body["explanation"], "stub");
    assert_eq!(ledger.calls(), (1, 1));
}

#[tokio::test]
async fn api_prefixed_route_behaves_the_same() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/api/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligibleForRewards"], true);
    assert_eq!(ledger.calls(), (1, 1));
}

#[tokio::test]
async fn missing_receipt_is_400_and_skips_ledger() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", false, false)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("No receipt detected"))
    );
    assert_eq!(body["eligibleForRewards"], false);
    assert_eq!(ledger.calls(), (0, 0));
}

#[tokio::test]
async fn stale_receipt_is_400_and_skips_ledger() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, false)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("date is incorrect"))
    );
    assert_eq!(ledger.calls(), (0, 0));
}

#[tokio::test]
async fn plastic_bag_is_200_but_not_eligible() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("non_recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Plastic bags are not eligible for rewards.");
    assert_eq!(body["eligibleForRewards"], false);
    assert_eq!(ledger.calls(), (0, 0));
}

#[tokio::test]
async fn ledger_rejection_is_500_with_outcome_body() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::rejecting("Device already submitted today"));
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Smart contract validation error: Device already submitted today"
    );
    assert_eq!(body["eligibleForRewards"], false);
    assert_eq!(ledger.calls(), (1, 0));
}

#[tokio::test]
async fn unconfirmed_registration_is_500() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::unconfirmed());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Transaction failed: Smart contract did not confirm submission."
    );
    assert_eq!(ledger.calls(), (1, 1));
}

#[tokio::test]
async fn classifier_failure_is_500_without_ledger() {
    let vision = Arc::new(FixedVision::failing("upstream unavailable"));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "classifier_error");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Error processing image"))
    );
    assert_eq!(ledger.calls(), (0, 0));
}

#[tokio::test]
async fn malformed_json_is_400_invalid_input() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let response = reqwest::Client::new()
        .post(server.url("/submitReceipt"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("malformed request should complete");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body should be json");
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(vision.calls(), 0);
}

#[tokio::test]
async fn missing_device_id_is_400() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::accepting());
    let server = start(&vision, &ledger).await;

    let body = serde_json::json!({ "image": png_data_url(), "address": ADDRESS });
    let (status, body) = post_json(&server, "/submitReceipt", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(vision.calls(), 0);
}

#[tokio::test]
async fn oversize_body_is_413() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::accepting());
    let gateway = GatewayConfig {
        max_body_bytes: 1024,
        ..GatewayConfig::default()
    };
    let server =
        GatewayTestServer::start(stub_state(vision.clone(), ledger.clone()), gateway).await;

    let mut body = submission("device-1");
    body["image"] = Value::String("A".repeat(4096));
    let response = reqwest::Client::new()
        .post(server.url("/submitReceipt"))
        .json(&body)
        .send()
        .await
        .expect("oversize request should complete");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(vision.calls(), 0);
    assert_eq!(ledger.calls(), (0, 0));
}

#[tokio::test]
async fn slow_registration_times_out_as_json_outcome() {
    let vision = Arc::new(FixedVision::answering(&verdict_json("recyclable", true, true)));
    let ledger = Arc::new(FixedLedger::slow_registration(Duration::from_millis(1500)));
    let gateway = GatewayConfig {
        request_timeout_secs: 5,
        ..GatewayConfig::default()
    };
    let state = stub_state_with_ledger_timeout(
        vision.clone(),
        ledger.clone(),
        Duration::from_millis(200),
    );
    let server = GatewayTestServer::start(state, gateway).await;

    let (status, body) = post_json(&server, "/submitReceipt", &submission("device-1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["eligibleForRewards"], false);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Smart contract submission error")
                && m.contains("did not answer"))
    );
    assert_eq!(ledger.calls(), (1, 1));
}
