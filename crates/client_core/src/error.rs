use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// Failures of the dream client. Every variant is recoverable: callers surface
/// it to the user and return to an idle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("service returned no analysis data")]
    MissingAnalysisData,
    #[error("not logged in: missing access token")]
    MissingCredential,
    #[error("malformed service response: {0}")]
    Decode(String),
}

impl FlowError {
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::MissingCredential)
    }
}

impl From<ApiError> for FlowError {
    fn from(value: ApiError) -> Self {
        match value.code {
            ErrorCode::Unauthorized => Self::Unauthorized(value.message),
            _ => Self::Service {
                status: value.status,
                message: value.message,
            },
        }
    }
}

impl From<reqwest::Error> for FlowError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}
