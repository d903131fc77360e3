//! Request tracing middleware

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;

/// Client address as reported by a fronting proxy
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
}

/// Run each request inside a span and log its outcome with timing
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = client_ip(request.headers());

    let span = tracing::info_span!(
        "request",
        method = %method,
        path = %path,
        client_ip = ?client_ip,
    );

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        if response.status().is_server_error() {
            tracing::error!(status, duration_ms, "Request completed with error");
        } else if response.status().is_client_error() {
            tracing::warn!(status, duration_ms, "Request completed with client error");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.9"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));

        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
