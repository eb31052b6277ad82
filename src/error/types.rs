use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the rectpackr crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced around the layout engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unrecognized value `{value}` for `{attribute}`")]
    UnknownValue {
        attribute: &'static str,
        value: String,
    },
    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
}
