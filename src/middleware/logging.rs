//! Logging middleware
//!
//! Provides request logging functionality.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::info;
use std::time::Instant;

/// Log method, path, status and latency of every request
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = redact_password(request.uri().path());
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Mask the first path segment, which carries the access password
pub fn redact_password(path: &str) -> String {
    let rest = path.trim_start_matches('/');
    if rest.is_empty() {
        return "/".to_string();
    }
    match rest.split_once('/') {
        Some((_, tail)) => format!("/***/{tail}"),
        None => "/***".to_string(),
    }
}
