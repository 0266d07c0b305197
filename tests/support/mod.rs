#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ecoearn::classifier::traits::VisionFuture;
use ecoearn::classifier::{ReceiptClassifier, VisionProvider};
use ecoearn::config::GatewayConfig;
use ecoearn::error::{ClassifierError, LedgerError};
use ecoearn::ledger::{LedgerFuture, RewardLedger};
use ecoearn::media::EncodedImage;
use ecoearn::pipeline::{SubmissionPipeline, SubmissionRequest};
use ecoearn::transport::gateway::{AppState, run_gateway_with_listener};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

/// Smallest payload the magic-byte sniffer accepts as PNG.
pub const PNG: [u8; 9] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

pub fn png_data_url() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(PNG))
}

pub fn verdict_json(bag_type: &str, detected: bool, valid: bool) -> String {
    format!(
        r#"{{"bagType":"{bag_type}","receiptDetected":{detected},"receiptValid":{valid},"confidenceScore":0.87,"explanation":"stub"}}"#
    )
}

pub fn submission(device_id: &str) -> serde_json::Value {
    serde_json::json!({
        "image": png_data_url(),
        "address": ADDRESS,
        "deviceID": device_id,
    })
}

/// Vision provider that answers every call with the same text.
pub struct FixedVision {
    answer: Result<String, String>,
    pub calls: AtomicUsize,
}

impl FixedVision {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VisionProvider for FixedVision {
    fn name(&self) -> &str {
        "fixed"
    }

    fn describe_image<'a>(
        &'a self,
        _prompt: &'a str,
        _image: &'a EncodedImage,
    ) -> VisionFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone().map_err(|message| ClassifierError::Request {
                provider: "fixed".into(),
                message,
            })
        })
    }
}

/// Ledger with a fixed answer for each call.
pub struct FixedLedger {
    validate: Result<(), String>,
    register: Result<bool, String>,
    register_delay: Duration,
    pub validate_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
}

impl FixedLedger {
    pub fn accepting() -> Self {
        Self {
            validate: Ok(()),
            register: Ok(true),
            register_delay: Duration::ZERO,
            validate_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            validate: Err(message.to_string()),
            ..Self::accepting()
        }
    }

    pub fn unconfirmed() -> Self {
        Self {
            register: Ok(false),
            ..Self::accepting()
        }
    }

    /// Registration answers only after `delay`.
    pub fn slow_registration(delay: Duration) -> Self {
        Self {
            register_delay: delay,
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.validate_calls.load(Ordering::SeqCst),
            self.register_calls.load(Ordering::SeqCst),
        )
    }
}

impl RewardLedger for FixedLedger {
    fn name(&self) -> &str {
        "fixed"
    }

    fn validate_submission<'a>(&'a self, _request: &'a SubmissionRequest) -> LedgerFuture<'a, ()> {
        Box::pin(async move {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            self.validate
                .clone()
                .map_err(|message| LedgerError::Validation {
                    ledger: "fixed".into(),
                    message,
                })
        })
    }

    fn register_submission<'a>(
        &'a self,
        _request: &'a SubmissionRequest,
    ) -> LedgerFuture<'a, bool> {
        Box::pin(async move {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            if !self.register_delay.is_zero() {
                tokio::time::sleep(self.register_delay).await;
            }
            self.register
                .clone()
                .map_err(|message| LedgerError::Registration {
                    ledger: "fixed".into(),
                    message,
                })
        })
    }
}

pub fn stub_state(
    vision: std::sync::Arc<FixedVision>,
    ledger: std::sync::Arc<FixedLedger>,
) -> AppState {
    stub_state_with_ledger_timeout(vision, ledger, Duration::from_secs(5))
}

pub fn stub_state_with_ledger_timeout(
    vision: std::sync::Arc<FixedVision>,
    ledger: std::sync::Arc<FixedLedger>,
    ledger_timeout: Duration,
) -> AppState {
    AppState::new(
        ReceiptClassifier::new(vision, Duration::from_secs(5)),
        SubmissionPipeline::new(ledger, ledger_timeout),
    )
}

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    pub async fn start(state: AppState, gateway: GatewayConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let handle = tokio::spawn(async move {
            run_gateway_with_listener(listener, state, &gateway).await
        });

        wait_until_gateway_ready(port).await;

        Self { port, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}
