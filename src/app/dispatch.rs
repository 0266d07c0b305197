use crate::Config;
use crate::classifier::{ClassificationVerdict, create_classifier};
use crate::cli::{Cli, Commands};
use crate::transport::gateway::run_gateway;
use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use tracing::info;

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            apply_serve_overrides(&mut config, port, host);
            info!(
                host = config.gateway.host.as_str(),
                port = config.gateway.port,
                "starting gateway"
            );
            run_gateway(&config).await
        }
        Commands::Classify {
            image,
            utc_offset_minutes,
        } => {
            let verdict = classify_file(&config, &image, utc_offset_minutes).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&verdict).context("serialize verdict")?
            );
            Ok(())
        }
    }
}

fn apply_serve_overrides(config: &mut Config, port: Option<u16>, host: Option<String>) {
    if let Some(port) = port {
        config.gateway.port = port;
    }
    if let Some(host) = host {
        config.gateway.host = host;
    }
}

/// Classify a photo on disk with the configured provider.
pub async fn classify_file(
    config: &Config,
    path: &Path,
    utc_offset_minutes: Option<i32>,
) -> Result<ClassificationVerdict> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let classifier = create_classifier(config)?;
    let today = classifier.today(utc_offset_minutes)?;
    let verdict = classifier
        .classify_on(&STANDARD.encode(bytes), today)
        .await
        .with_context(|| format!("Failed to classify {}", path.display()))?;
    Ok(verdict)
}
