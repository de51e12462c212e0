//! Page resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming logical path
//!     → engine.rs RESOLVE_ROUTE (normalize, traversal guard, route match)
//!     → LOAD_CONTENT (flatten key, read HTML + config through the cache)
//!     → RENDER (include splice, script-count check, block substitution)
//!     → RESPOND (PageResult + status class)
//!
//! Any failure
//!     → ERROR_RESPONSE (404/500 artifact through the same cache)
//! ```
//!
//! # Design Decisions
//! - All failures are recovered at this boundary; nothing propagates to
//!   the transport layer as a fault
//! - Every failure still returns renderable HTML plus a machine-readable
//!   error tag

pub mod engine;
pub mod error;
pub mod result;

pub use engine::{PageResolver, Resolution};
pub use error::PageError;
pub use result::{PageData, PageResult};
