use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::error::ExplainError;
use crate::prompt;
use crate::AppState;

use super::models::{ErrorResponse, ExplainRequest, ExplainResponse};

pub const FALLBACK_EXPLANATION: &str = "Unable to generate explanation.";

pub async fn explain(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExplainResponse>, ExplainError> {
    // Decoded by hand so the Content-Type header is not required.
    let payload: ExplainRequest = serde_json::from_slice(&body)
        .map_err(|err| ExplainError::MalformedBody(err.to_string()))?;

    let code = payload.code().ok_or(ExplainError::MissingCode)?;
    let language = payload.language();

    info!(
        language = prompt::language_label(language),
        code_len = code.len(),
        "explaining code"
    );

    let system = prompt::system_prompt(language);
    let user = prompt::user_prompt(&code, language);
    let explanation = state
        .completer
        .complete(&system, &user)
        .await?
        .unwrap_or_else(|| FALLBACK_EXPLANATION.to_string());

    Ok(Json(ExplainResponse { explanation }))
}

/// CORS preflight. Headers come from the router-wide layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Unrouted paths. `OPTIONS` is acknowledged everywhere.
pub async fn not_found(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
