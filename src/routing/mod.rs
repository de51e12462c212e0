//! Route pattern subsystem.
//!
//! # Data Flow
//! ```text
//! Route declarations (config TOML / routes JSON file):
//!     RouteSpec[]  e.g. { path = "/route/:q<int>", template = { path = "/route" } }
//!     → compiler.rs (token parse, typed capture groups, anchored regex)
//!     → Freeze as immutable RouteTable
//!
//! Per request:
//!     logical path
//!     → table.rs (scan in declaration order, first match wins)
//!     → Return: canonical path + typed params + placeholder bindings, or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled once at startup, immutable at runtime
//! - First match wins (declaration order), never best match
//! - Parameter extraction is positional: capture order == token order
//! - Type conversion failures fail closed (treated as no match)

pub mod compiler;
pub mod spec;
pub mod table;

pub use compiler::{compile, CompileError, CompiledRoute};
pub use spec::{ParamType, RouteSpec, TemplateBinding, TypedValue};
pub use table::{RouteMatch, RouteTable};
