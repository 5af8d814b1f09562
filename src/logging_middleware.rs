// src/logging_middleware.rs
//! Per-request access log
//!
//! Bodies are never logged: they carry passwords and credentials.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::auth::extractors::presented_credential;
use crate::common::{safe_token_log, AppState};

/// Logs method, path, status, latency, and a masked view of the presented credential
pub async fn log_request_response(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let credential = presented_credential(request.headers(), &state.credential_header)
        .map(safe_token_log);

    debug!(
        method = %method,
        path = %path,
        credential = ?credential,
        "📥 Request"
    );

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        warn!(method = %method, path = %path, status = %status, elapsed_ms, "📤 Response");
    } else {
        info!(method = %method, path = %path, status = %status, elapsed_ms, "📤 Response");
    }

    response
}
