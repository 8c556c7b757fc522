//! Error types shared across DuoCast crates.

/// Top-level error type for DuoCast operations.
#[derive(Debug, thiserror::Error)]
pub enum DuocastError {
    #[error("Invalid dimension {width}x{height}: dimensions must be positive")]
    InvalidDimension { width: f64, height: f64 },

    #[error("No {slot} source attached")]
    NoSourceAttached { slot: String },

    #[error("Invalid crop transition: {attempted} is not allowed from {from}")]
    InvalidStateTransition { from: String, attempted: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Stream error: {message}")]
    Stream { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DuocastError.
pub type DuocastResult<T> = Result<T, DuocastError>;

impl DuocastError {
    pub fn invalid_dimension(width: f64, height: f64) -> Self {
        Self::InvalidDimension { width, height }
    }

    pub fn no_source(slot: impl Into<String>) -> Self {
        Self::NoSourceAttached { slot: slot.into() }
    }

    pub fn invalid_transition(from: impl Into<String>, attempted: impl Into<String>) -> Self {
        Self::InvalidStateTransition {
            from: from.into(),
            attempted: attempted.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
