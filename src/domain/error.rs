//! Domain error types and process exit-code mapping.

/// Top-level error type for trendgate.
#[derive(Debug, thiserror::Error)]
pub enum TrendgateError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("invalid transition: {reason}")]
    InvalidTransition { reason: String },

    #[error("state persistence error: {reason}")]
    State { reason: String },

    #[error("notification error: {reason}")]
    Notify { reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrendgateError> for std::process::ExitCode {
    fn from(err: &TrendgateError) -> Self {
        let code: u8 = match err {
            TrendgateError::Io(_) => 1,
            TrendgateError::ConfigParse { .. }
            | TrendgateError::ConfigMissing { .. }
            | TrendgateError::ConfigInvalid { .. } => 2,
            TrendgateError::Data { .. }
            | TrendgateError::State { .. }
            | TrendgateError::Notify { .. } => 3,
            TrendgateError::InvalidInput { .. } | TrendgateError::InvalidTransition { .. } => 4,
            TrendgateError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
