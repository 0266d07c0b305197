use crate::support::{GatewayTestServer, submission};
use ecoearn::config::{Config, LedgerBackend};
use ecoearn::transport::gateway::build_state;
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_answer(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

async fn mount_vision(server: &MockServer, content: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_answer(content)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn config_for(vision: &MockServer) -> Config {
    let mut config = Config::default();
    config.classifier.base_url = format!("{}/v1", vision.uri());
    config.classifier.api_key = Some("sk-test".into());
    config.classifier.model = "gpt-4o".into();
    config.ledger.backend = LedgerBackend::Memory;
    config
}

#[tokio::test]
async fn memory_ledger_rewards_once_per_device_per_day() {
    let vision = MockServer::start().await;
    let answer = "```json\n{\"bagType\":\"recyclable\",\"receiptDetected\":true,\"receiptValid\":true,\"confidenceScore\":0.93,\"explanation\":\"Paper bag on a receipt dated today\"}\n```";
    mount_vision(&vision, answer, 2).await;

    let config = config_for(&vision);
    let state = build_state(&config).expect("state should build from config");
    let server = GatewayTestServer::start(state, config.gateway.clone()).await;
    let client = reqwest::Client::new();

    let first = client
        .post(server.url("/submitReceipt"))
        .json(&submission("kiosk-7"))
        .send()
        .await
        .expect("first submission should complete");
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = first.json().await.expect("first body should be json");
    assert_eq!(first["eligibleForRewards"], true);
    assert_eq!(first["confidenceScore"], 0.93);

    let second = client
        .post(server.url("/submitReceipt"))
        .json(&submission("kiosk-7"))
        .send()
        .await
        .expect("second submission should complete");
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let second: Value = second.json().await.expect("second body should be json");
    assert_eq!(second["eligibleForRewards"], false);
    assert!(
        second["message"]
            .as_str()
            .is_some_and(|m| m.contains("already submitted a receipt today"))
    );

    vision.verify().await;
}

#[tokio::test]
async fn upstream_error_does_not_leak_api_key() {
    let vision = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"error":{"message":"Incorrect API key provided: sk-test"}}"#),
        )
        .mount(&vision)
        .await;

    let config = config_for(&vision);
    let state = build_state(&config).expect("state should build from config");
    let server = GatewayTestServer::start(state, config.gateway.clone()).await;

    let response = reqwest::Client::new()
        .post(server.url("/submitReceipt"))
        .json(&submission("kiosk-8"))
        .send()
        .await
        .expect("submission should complete");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("error body should be json");
    assert_eq!(body["error"], "classifier_error");
    assert!(!body.to_string().contains("sk-test"));
}
