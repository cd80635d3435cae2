//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, SubmitError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Submit(SubmitError::RequestFailed(msg)) => format!(
            "Backend unreachable: {}\nCheck [backend].url in the configuration",
            msg
        ),
        other => other.to_string(),
    }
}
