//! Failure classes of the explain endpoint and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::ErrorResponse;
use crate::gateway::UpstreamError;

pub const CODE_REQUIRED: &str = "Code is required";
pub const RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";
pub const CREDITS_EXHAUSTED: &str = "AI credits exhausted. Please add more credits.";

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Code is required")]
    MissingCode,
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ExplainError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCode => StatusCode::BAD_REQUEST,
            Self::Upstream(UpstreamError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(UpstreamError::CreditsExhausted) => StatusCode::PAYMENT_REQUIRED,
            Self::MalformedBody(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response body.
    pub fn message(&self) -> String {
        match self {
            Self::MissingCode => CODE_REQUIRED.to_string(),
            Self::Upstream(UpstreamError::RateLimited) => RATE_LIMITED.to_string(),
            Self::Upstream(UpstreamError::CreditsExhausted) => CREDITS_EXHAUSTED.to_string(),
            other => {
                let text = other.to_string();
                if text.is_empty() {
                    "Unknown error".to_string()
                } else {
                    text
                }
            }
        }
    }
}

impl IntoResponse for ExplainError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %self, "explain request rejected");
        } else {
            error!(status = status.as_u16(), error = %self, "explain request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
