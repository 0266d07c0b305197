use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `EcoEarn`.
///
/// Each external-call wrapper returns its own error enum so the decision
/// pipeline and the HTTP boundary can match on the failure kind instead of
/// inspecting message strings. Startup and CLI code keep using
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum EcoError {
    // ── Caller input ────────────────────────────────────────────────────
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    // ── Vision / LLM classifier ─────────────────────────────────────────
    #[error("classifier: {0}")]
    Classifier(#[from] ClassifierError),

    // ── Reward ledger ───────────────────────────────────────────────────
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EcoError {
    /// Stable snake_case identifier used in logs and JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Classifier(_) => "classifier_error",
            Self::Ledger(LedgerError::Validation { .. }) => "validation_error",
            Self::Ledger(LedgerError::Registration { .. }) => "registration_error",
            Self::Config(_) => "config_error",
            Self::Other(_) => "unexpected_error",
        }
    }

    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

// ─── Input errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("image payload is empty")]
    EmptyImage,

    #[error("image is not valid base64: {0}")]
    Base64(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image exceeds {max_bytes} bytes after decoding")]
    TooLarge { max_bytes: usize },

    #[error("wallet address must be 0x followed by 40 hex digits")]
    InvalidAddress,

    #[error("deviceID is required")]
    MissingDeviceId,

    #[error("utcOffsetMinutes must be within ±840, got {0}")]
    InvalidUtcOffset(i32),

    #[error("malformed request body: {0}")]
    Body(String),
}

// ─── Classifier errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned an empty response")]
    EmptyResponse { provider: String },

    #[error("no JSON object found in classifier response")]
    NoJson,

    #[error("classifier response is not valid JSON: {0}")]
    Malformed(String),

    #[error("classifier response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("classifier did not answer within {secs}s")]
    Timeout { secs: u64 },
}

// ─── Ledger errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("submission rejected by {ledger}: {message}")]
    Validation { ledger: String, message: String },

    #[error("registration on {ledger} failed: {message}")]
    Registration { ledger: String, message: String },
}

impl LedgerError {
    /// Provider message without the ledger prefix, for user-facing text.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } | Self::Registration { message, .. } => message,
        }
    }
}

// ─── Config errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, EcoError>;
