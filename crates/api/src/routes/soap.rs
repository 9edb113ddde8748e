//! The SOAP endpoint.
//!
//! `POST /soap` takes an envelope in the request body and returns the
//! response envelope, or a fault envelope when processing fails. Caller
//! identity comes from the `x-caller-dn` header when present; otherwise
//! the connector's configured default applies.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Router};

use crate::error::{ApiError, ApiResult, TEXT_XML};
use crate::state::AppState;

/// Header carrying the caller identity.
pub const CALLER_DN_HEADER: &str = "x-caller-dn";

async fn handle_soap(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Response> {
    let user_dn = headers
        .get(CALLER_DN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    // Script execution is synchronous by contract; keep it off the async
    // workers.
    let connector = Arc::clone(&state.connector);
    let envelope = tokio::task::spawn_blocking(move || {
        connector.process_envelope(&body, user_dn.as_deref())
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(([(header::CONTENT_TYPE, TEXT_XML)], envelope).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/soap", post(handle_soap))
}
