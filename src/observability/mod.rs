//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`; the engine only emits events,
//!   the installed subscriber decides formatting and routing
//! - `RUST_LOG` overrides the configured default filter

pub mod logging;
