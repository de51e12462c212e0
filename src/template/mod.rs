//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Raw template text
//!     → renderer.rs splice_includes (component tags resolved via the cache)
//!     → assets.rs (script/style spans extracted out-of-band)
//!     → renderer.rs substitute / conditional (block pass, {json} merge)
//!     → Rendered HTML + ordered script/style sequences
//! ```
//!
//! # Design Decisions
//! - Blocks are flat: `{name}...{/name}` pairs never nest
//! - A block name repeated within one template is a parameter conflict;
//!   the occurrences are left untouched and a warning is logged
//! - Include splicing runs before the outer template's substitution
//! - Include recursion is depth-bounded (hardening over the observed
//!   behavior, which had no cycle guard)

pub mod assets;
pub mod renderer;

pub use assets::{extract_assets, validate_single_script, ExtractedAssets, RenderError};
pub use renderer::{ParamMap, Renderer, MAX_INCLUDE_DEPTH};
