//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the page
//! server. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

use crate::routing::RouteSpec;

/// Root configuration for the page server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Content store layout and cache behavior.
    pub content: ContentConfig,

    /// Route declarations, inline.
    pub routes: Vec<RouteSpec>,

    /// Optional JSON routes file, merged after the inline declarations.
    pub routes_file: Option<String>,

    /// Reverse proxy to the backend API.
    pub proxy: ProxyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,

    /// Maximum concurrently served requests (backpressure); excess
    /// requests queue until a slot frees.
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Content store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Site root holding `pages/`, `templates/`, `static/`, `data/` and
    /// the SPA shell `index.html`.
    pub root: String,

    /// Bypass the content memo table and re-read files on every request.
    /// Development only.
    pub debug_reads: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: "site".to_string(),
            debug_reads: false,
        }
    }
}

/// Reverse proxy configuration for the backend API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Forward `/api/*` requests when enabled.
    pub enabled: bool,

    /// Upstream base URL.
    pub backend_url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "pageserve=debug,tower_http=debug".to_string(),
        }
    }
}
