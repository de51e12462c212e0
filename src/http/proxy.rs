//! Backend API proxying.
//!
//! # Responsibilities
//! - Forward `/api/*` requests to the configured backend
//! - Strip the `/api` prefix and rewrite the target URI
//! - Convert upstream failures into the wire error shape
//!
//! # Design Decisions
//! - Single attempt, no retries: the page server is not responsible for
//!   backend resilience
//! - Host header is rewritten to the backend authority

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use serde_json::json;

use crate::http::server::AppState;

/// Shared upstream HTTP client.
pub type ProxyClient = Client<HttpConnector, Body>;

/// Forward a request to the backend with the `/api` prefix stripped.
pub async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let stripped = request
        .uri()
        .path()
        .strip_prefix("/api")
        .unwrap_or(request.uri().path());
    let path_and_query = match request.uri().query() {
        Some(q) => format!("{}?{}", stripped, q),
        None => stripped.to_string(),
    };

    let target = format!(
        "{}{}",
        state.proxy.backend_url.trim_end_matches('/'),
        path_and_query
    );
    let uri = match target.parse() {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(target = %target, error = %e, "Bad proxy target");
            return proxy_error();
        }
    };

    tracing::debug!(method = %request.method(), target = %target, "Proxying request");

    let (mut parts, body) = request.into_parts();
    parts.uri = uri;
    // Let the client derive Host from the rewritten authority.
    parts.headers.remove(header::HOST);
    let upstream_request = Request::from_parts(parts, body);

    match state.client.request(upstream_request).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, "Proxy request failed");
            proxy_error()
        }
    }
}

fn proxy_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "Proxy error",
            "data": { "page": "500 Proxy Error" }
        })),
    )
        .into_response()
}
