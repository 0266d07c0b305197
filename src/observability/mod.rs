//! Process-wide tracing setup.

use crate::config::ObservabilityConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse `observability.log_level`; `None` when the value is not a level.
pub fn parse_level(level: &str) -> Option<Level> {
    level.trim().parse().ok()
}

/// Install the global fmt subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init_tracing(config: &ObservabilityConfig) {
    let parsed = parse_level(&config.log_level);
    let level = parsed.unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(config.ansi)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
        return;
    }

    if parsed.is_none() {
        tracing::warn!(
            log_level = config.log_level.as_str(),
            "unknown log level, using info"
        );
    }
}
