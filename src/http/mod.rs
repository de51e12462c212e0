//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → POST /pages/{path}      → resolver engine → PageResult JSON
//!     → POST /templates/{name}  → content cache   → raw template
//!     → POST /navigation        → nav/menu templates
//!     → GET  /pages/{path}.js   → per-page script file
//!     → /api/*                  → proxy.rs (forward to backend)
//!     → everything else         → static assets / SPA shell
//! ```
//!
//! # Design Decisions
//! - The transport maps resolver status classes to HTTP codes; it never
//!   invents page bodies itself
//! - Proxying is a single attempt; the backend owns its own resilience

pub mod proxy;
pub mod server;

pub use server::{AppState, HttpServer};
