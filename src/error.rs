//! Error types and handling for the `TravelPlan` service

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the `TravelPlan` service
#[derive(Error, Debug)]
pub enum TravelPlanError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Client input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl TravelPlanError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlanError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelPlanError::Validation { message } => message.clone(),
        }
    }
}

/// Why an upstream lookup could not produce real data.
///
/// Never surfaced to API clients: fetchers log it and return their fallback.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("no usable data: {0}")]
    Empty(String),
}

impl FetchError {
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn empty<S: Into<String>>(message: S) -> Self {
        Self::Empty(message.into())
    }

    /// Stable label used as the `kind` field in fallback logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(e) if e.is_timeout() => "timeout",
            FetchError::Network(e) if e.is_decode() => "parse",
            FetchError::Network(_) => "network",
            FetchError::Status(_) => "status",
            FetchError::Parse(_) => "parse",
            FetchError::Auth(_) => "auth",
            FetchError::Empty(_) => "empty",
        }
    }
}
