//! Request tracking middleware.
//!
//! Captures request metadata before the handler runs, then hands the
//! completed request/response pair to the recorder. Recording happens on
//! a spawned task after the response is produced, so a client disconnect
//! never aborts a delivery in flight, and a delivery failure never
//! affects the response.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use reqtrack_track::{CapturedRequest, Principal};

use crate::state::AppState;

/// Axum middleware wrapping every routed request.
pub async fn track_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let captured = capture(&request);
    let principal = request
        .extensions()
        .get::<Principal>()
        .copied()
        .unwrap_or_default();

    let response = next.run(request).await;
    let status_code = response.status().as_u16();

    let recorder = state.recorder.clone();
    tokio::spawn(async move {
        if let Err(e) = recorder.record(&captured, status_code, &principal).await {
            warn!(error = %e, route = %captured.path, "Failed to record request");
        }
    });

    response
}

/// Convert the axum request into the framework-free capture type.
///
/// Header values that are not valid UTF-8 are dropped; a duplicated
/// header keeps its first value.
fn capture(request: &Request) -> CapturedRequest {
    let mut headers = BTreeMap::new();
    for (name, value) in request.headers() {
        if let Ok(value) = value.to_str() {
            headers
                .entry(name.as_str().to_ascii_lowercase())
                .or_insert_with(|| value.to_string());
        }
    }

    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string());

    CapturedRequest {
        method: request.method().as_str().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().unwrap_or("").to_string(),
        headers,
        remote_addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    #[test]
    fn capture_lowercases_headers_and_splits_query() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/things?page=2&sort=asc")
            .header("User-Agent", "curl/8.0")
            .header("X-Request-Id", "abc")
            .body(Body::empty())
            .unwrap();

        let captured = capture(&request);
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.path, "/things");
        assert_eq!(captured.query, "page=2&sort=asc");
        assert_eq!(captured.header("user-agent"), Some("curl/8.0"));
        assert_eq!(captured.header("x-request-id"), Some("abc"));
        assert_eq!(captured.remote_addr, None);
    }

    #[test]
    fn capture_reads_the_connection_peer() {
        let mut request = HttpRequest::builder()
            .uri("/things")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("10.0.0.1:54321".parse().unwrap()));

        let captured = capture(&request);
        assert_eq!(captured.remote_addr.as_deref(), Some("10.0.0.1"));
        assert_eq!(captured.query, "");
    }
}
