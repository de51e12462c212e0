//! Content store subsystem.
//!
//! # Data Flow
//! ```text
//! Logical key ("pages/home/home.html")
//!     → cache.rs (memo table, debug bypass)
//!     → store.rs (FsStore directory tree / BlobStore exported blob)
//!     → Return: ReadOutcome { success, payload, error }
//! ```
//!
//! # Design Decisions
//! - Cache is append-only and keyed by immutable strings; concurrent
//!   first-reads of one key may duplicate I/O, last writer wins
//! - Entries never expire and are never revalidated against the store;
//!   staleness over a process lifetime is an accepted tradeoff
//! - `.json` keys always decode to structured data, other keys are opaque text
//! - Every failure path still carries a renderable fallback payload

pub mod cache;
pub mod scaffold;
pub mod store;

pub use cache::{CacheError, ContentCache, Payload, ReadOutcome};
pub use scaffold::PageScaffold;
pub use store::{BlobStore, FsStore, StoreError, StoreReader};
