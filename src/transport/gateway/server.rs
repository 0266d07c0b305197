use super::AppState;
use super::handlers::{handle_health, handle_submit_receipt};

use crate::classifier::create_classifier;
use crate::config::{Config, GatewayConfig};
use crate::ledger::create_ledger;
use crate::pipeline::SubmissionPipeline;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
pub fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Classifier and pipeline wired from config.
pub fn build_state(config: &Config) -> Result<AppState> {
    let classifier = create_classifier(config).context("create receipt classifier")?;
    let ledger = create_ledger(&config.ledger).context("create reward ledger")?;
    let pipeline = SubmissionPipeline::new(ledger, Duration::from_secs(config.ledger.timeout_secs));
    Ok(AppState::new(classifier, pipeline))
}

/// Run the HTTP gateway on `gateway.host:gateway.port`.
pub async fn run_gateway(config: &Config) -> Result<()> {
    let host = config.gateway.host.as_str();
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be exposed to the network.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let state = build_state(config)?;
    let bind_host = host.trim_start_matches('[').trim_end_matches(']');
    let listener = tokio::net::TcpListener::bind((bind_host, config.gateway.port))
        .await
        .with_context(|| format!("bind gateway socket {host}:{}", config.gateway.port))?;

    run_gateway_with_listener(listener, state, &config.gateway).await
}

/// Run the HTTP gateway from a pre-bound listener until Ctrl-C.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
    gateway: &GatewayConfig,
) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("get gateway listener local address")?;

    print_gateway_banner(&local_addr, &state);
    tracing::info!(
        %local_addr,
        classifier = state.classifier.provider_name(),
        ledger = state.pipeline.ledger_name(),
        "gateway started"
    );

    let app = build_app(state, gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}

fn print_gateway_banner(local_addr: &SocketAddr, state: &AppState) {
    println!("Gateway listening on {local_addr}");
    println!("  POST /submitReceipt");
    println!("  POST /api/submitReceipt");
    println!("  GET  /health");
    println!(
        "  classifier: {}  ledger: {}",
        state.classifier.provider_name(),
        state.pipeline.ledger_name()
    );
}

/// Router with every route and layer; exposed for tests that inject stubs.
pub fn build_app(state: AppState, gateway: &GatewayConfig) -> Router {
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/submitReceipt", post(handle_submit_receipt))
        .route("/api/submitReceipt", post(handle_submit_receipt));

    let mut app = app
        .with_state(state)
        .layer(DefaultBodyLimit::max(gateway.max_body_bytes))
        .layer(RequestBodyLimitLayer::new(gateway.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ));

    if !gateway.cors_origins.is_empty() {
        let origins: Vec<_> = gateway
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        );
    }

    app
}
