//! Shared plumbing for outbound HTTP providers (classifier API, ledger relay).

pub mod http_client;
pub mod scrub;

pub use http_client::build_provider_client;
pub use scrub::{response_error_message, sanitize_api_error, scrub_secret_patterns};
