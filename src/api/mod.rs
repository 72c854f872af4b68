mod handlers;
mod models;

use axum::{
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue,
    },
    routing::post,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::AppState;

pub use handlers::{explain, not_found, preflight, FALLBACK_EXPLANATION};
pub use models::{ErrorResponse, ExplainRequest, ExplainResponse};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(explain).options(preflight))
        .route("/explain-code", post(explain).options(preflight))
        .fallback(not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
}
