//! Validation errors raised while assembling tool command lines.
//!
//! These always indicate caller mistakes (a missing or malformed parameter),
//! never execution failures, so transports map them to invalid-request
//! responses rather than server errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    /// A required parameter was absent or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A parameter was present but failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: String,
    },
}

impl ToolError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
