#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use ecoearn::Config;
use ecoearn::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };

    ecoearn::observability::init_tracing(&config.observability);
    ecoearn::app::dispatch::dispatch(cli, config).await
}
