//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch page/template requests to the resolution engine
//! - Serve static assets and the SPA shell
//! - Forward `/api` traffic to the backend

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ProxyConfig, ServerConfig};
use crate::content::{ContentCache, FsStore, Payload};
use crate::http::proxy::{self, ProxyClient};
use crate::resolver::{engine::guard_key, PageResolver, PageResult};
use crate::routing::{CompileError, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PageResolver>,
    pub cache: Arc<ContentCache>,
    pub content_root: PathBuf,
    pub proxy: ProxyConfig,
    pub client: ProxyClient,
}

/// HTTP server for the page service.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, CompileError> {
        let content_root = PathBuf::from(&config.content.root);

        let routes = RouteTable::compile(&config.routes)?;
        let cache = Arc::new(ContentCache::new(
            FsStore::new(&content_root),
            config.content.debug_reads,
        ));
        let resolver = Arc::new(PageResolver::new(routes, Arc::clone(&cache)));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            resolver,
            cache,
            content_root,
            proxy: config.proxy.clone(),
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let root = state.content_root.clone();

        let mut router = Router::new()
            .route(
                "/pages/{*path}",
                post(page_handler).get(page_script_handler),
            )
            .route("/templates/{*name}", post(template_handler))
            .route("/navigation", post(navigation_handler));

        if state.proxy.enabled {
            router = router.route("/api/{*rest}", axum::routing::any(proxy::proxy_handler));
        }

        router
            .nest_service("/js", ServeDir::new(root.join("static/js")))
            .nest_service("/css", ServeDir::new(root.join("static/css")))
            .nest_service("/img", ServeDir::new(root.join("data/img")))
            .nest_service("/static", ServeDir::new(root.join("static")))
            .route_service("/favicon.ico", ServeFile::new(root.join("data/img/favicon.ico")))
            .fallback_service(ServeFile::new(root.join("index.html")))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            // One shared semaphore across connections; excess requests
            // queue until a slot frees.
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_connections,
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            content_root = %self.config.content.root,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Main page endpoint: resolve a logical path into the wire contract.
async fn page_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    tracing::debug!(path = %path, "Resolving page");
    let resolution = state.resolver.resolve(&path);
    let status =
        StatusCode::from_u16(resolution.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(resolution.result))
}

/// Per-page script assets: `GET /pages/<path>.js` serves the sibling `.js`
/// artifact of the page, guarded like any other content key.
async fn page_script_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    // The wildcard can capture a leading slash (double-slash request);
    // normalize like the resolver before the suffix split and key guard.
    let path = path.trim_start_matches('/');
    let Some(page_path) = path.strip_suffix(".js") else {
        return wire_error(
            StatusCode::NOT_FOUND,
            "PageNotFound",
            "404 Not Found".to_string(),
        );
    };

    if guard_key(page_path).is_err() {
        return wire_error(
            StatusCode::BAD_REQUEST,
            "InvalidPath",
            "400 Bad Request".to_string(),
        );
    }

    let flat = page_path.replace('/', "_");
    let file = state
        .content_root
        .join("pages")
        .join(page_path)
        .join(format!("{}.js", flat));

    match tokio::fs::read(&file).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/javascript")],
            bytes,
        )
            .into_response(),
        Err(_) => {
            tracing::warn!(path = %path, "Page script not found");
            wire_error(
                StatusCode::NOT_FOUND,
                "PageNotFound",
                "404 Not Found".to_string(),
            )
        }
    }
}

/// Raw template fetch used by the client loader for nav/menu/components.
async fn template_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    if guard_key(&name).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Invalid path" })),
        )
            .into_response();
    }

    let outcome = state.cache.read(&format!("templates/{}", name));
    if !outcome.success {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "Template not found" })),
        )
            .into_response();
    }

    let data = match outcome.payload {
        Payload::Text(text) => serde_json::Value::String(text),
        Payload::Json(value) => value,
    };
    Json(json!({ "success": true, "data": data })).into_response()
}

/// Navigation chrome: the nav/menu template pair, empty on missing parts.
async fn navigation_handler(State(state): State<AppState>) -> Response {
    let read = |key: &str| {
        let outcome = state.cache.read(key);
        if outcome.success {
            outcome.payload.to_text()
        } else {
            String::new()
        }
    };

    Json(json!({
        "success": true,
        "data": {
            "nav": read("templates/nav.html"),
            "menu": read("templates/menu.html"),
        }
    }))
    .into_response()
}

/// Failure response in the page wire shape, so clients always get a body.
fn wire_error(status: StatusCode, tag: &str, page: String) -> Response {
    (status, Json(PageResult::failed(tag, page))).into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
