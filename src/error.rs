//! Error types for the policy interpreter and its ambient surfaces.

use thiserror::Error;

/// Policy evaluation errors
///
/// Raised by the splitter and the interpreters. None of these ever escape an
/// event callback: the binder logs them and moves on to the next policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Unbalanced closing bracket at offset {position} in {input:?}")]
    UnbalancedBrackets {
        input: String,
        position: usize,
        partial: Vec<String>,
    },

    #[error("{interaction} policy {policy:?} needs at least {expected} arguments, got {actual}")]
    Arity {
        interaction: &'static str,
        policy: String,
        expected: usize,
        actual: usize,
    },

    #[error("Element not found: id={id} key={key} value={value}")]
    ElementNotFound {
        id: String,
        key: String,
        value: String,
    },

    #[error("Context markers kept reappearing after {limit} resolution passes: {policy}")]
    ResolveLimitExceeded { limit: usize, policy: String },
}

/// Remote submission errors
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to encode solver request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SubmitError::RequestFailed(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            SubmitError::RequestFailed(format!("Connection error: {}", err))
        } else {
            SubmitError::RequestFailed(err.to_string())
        }
    }
}

/// Errors surfaced to library users and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid element tree: {0}")]
    InvalidTree(String),

    #[error("Invalid event script: {0}")]
    InvalidScript(String),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
