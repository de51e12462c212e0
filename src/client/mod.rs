//! SPA-counterpart page loading.
//!
//! # Data Flow
//! ```text
//! Navigation target path
//!     → loader.rs (same compiled route table as the server)
//!     → POST /pages/<path> (wire contract: PageResult)
//!     → asset extraction + {{name}} raw interpolation
//!     → derive chain walk (ancestor pages into named containers)
//!     → Ordered frames for the host to install
//! ```
//!
//! # Design Decisions
//! - Route-matching semantics are identical to the server by construction:
//!   both sides share `routing::RouteTable`
//! - DOM specifics stay with the host; this module stops at ordered
//!   (container, html, assets) frames

pub mod loader;

pub use loader::{ClientError, ComposedPage, Frame, PageClient, MAX_DERIVE_DEPTH};
