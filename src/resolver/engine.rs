//! Page resolution state machine.
//!
//! # Responsibilities
//! - Normalize and guard the incoming logical path
//! - Map dynamic paths to canonical content keys via the route table
//! - Load HTML/config artifacts through the cache, render, and package
//! - Recover every failure into a structured result with fallback HTML
//!
//! # Design Decisions
//! - Traversal guard runs before any store access
//! - Missing/invalid JSON config degrades to an empty object, never an error
//! - 404/500 bodies come from reserved artifacts read through the same
//!   cache, never hand-authored at this layer

use std::sync::Arc;

use crate::content::{CacheError, ContentCache};
use crate::resolver::error::PageError;
use crate::resolver::result::PageResult;
use crate::routing::RouteTable;
use crate::template::{validate_single_script, ParamMap, Renderer};

/// Reserved error artifacts; the content store must always resolve these.
const ERROR_404_KEY: &str = "pages/error/404/error_404.html";
const ERROR_500_KEY: &str = "pages/error/500/error_500.html";

/// A packaged response: wire result plus the status class the transport
/// layer should emit.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub status: u16,
    pub result: PageResult,
}

/// Per-process orchestrator tying routes, cache and renderer together.
pub struct PageResolver {
    routes: RouteTable,
    cache: Arc<ContentCache>,
    renderer: Renderer,
}

impl PageResolver {
    pub fn new(routes: RouteTable, cache: Arc<ContentCache>) -> Self {
        Self {
            routes,
            cache,
            renderer: Renderer::new(),
        }
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Resolve a logical path into a page result. Never panics or returns
    /// an error past this boundary.
    pub fn resolve(&self, raw_path: &str) -> Resolution {
        match self.try_resolve(raw_path) {
            Ok(resolution) => resolution,
            Err(err) => self.error_response(raw_path, err),
        }
    }

    fn try_resolve(&self, raw_path: &str) -> Result<Resolution, PageError> {
        // RESOLVE_ROUTE: normalize, guard, match.
        let path = raw_path.trim_start_matches('/').to_string();
        guard_key(&path)?;

        let (canonical, bindings) = match self.routes.match_path(&format!("/{}", path)) {
            Some(m) => {
                tracing::debug!(path = %path, canonical = %m.canonical_path, "Route matched");
                let bindings: ParamMap = m
                    .bindings
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect();
                (
                    m.canonical_path.trim_start_matches('/').to_string(),
                    bindings,
                )
            }
            None => (path, ParamMap::new()),
        };

        // LOAD_CONTENT: flatten separators, read both artifacts.
        let flat = canonical.replace('/', "_");
        let html_key = format!("pages/{}/{}.html", canonical, flat);
        let json_key = format!("pages/{}/{}.json", canonical, flat);

        let html = self.cache.read(&html_key);
        if !html.success {
            return Err(html
                .error
                .map(PageError::from)
                .unwrap_or(PageError::PageNotFound));
        }
        let body = html.payload.to_text();

        let config_outcome = self.cache.read(&json_key);
        let config = match config_outcome.error {
            // Missing or unparsable config degrades gracefully.
            Some(CacheError::NotFound) | Some(CacheError::InvalidJson) | Some(CacheError::Io(_)) => {
                serde_json::Value::Object(Default::default())
            }
            None => config_outcome
                .payload
                .as_json()
                .cloned()
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        };

        // RENDER: include splice, script-count check, block substitution.
        validate_single_script(&body)?;
        let cache = Arc::clone(&self.cache);
        let resolve_include = move |name: &str| {
            let outcome = cache.read(&format!("templates/{}", name));
            if outcome.success {
                Some(outcome.payload.to_text())
            } else {
                None
            }
        };
        let spliced = self.renderer.splice_includes(&body, &resolve_include);
        let rendered = self.renderer.substitute(&spliced, &bindings);

        // RESPOND.
        Ok(Resolution {
            status: 200,
            result: PageResult::ok(rendered, config),
        })
    }

    fn error_response(&self, path: &str, err: PageError) -> Resolution {
        let status = err.status();
        let body = match &err {
            PageError::InvalidPath => {
                tracing::warn!(path = %path, "Rejected page path");
                "400 Bad Request".to_string()
            }
            PageError::PageNotFound => self.artifact(ERROR_404_KEY),
            other => {
                tracing::error!(path = %path, error = %other, "Page resolution failed");
                self.artifact(ERROR_500_KEY)
            }
        };
        Resolution {
            status,
            result: PageResult::failed(err.wire_tag(), body),
        }
    }

    /// Read a reserved error artifact. The fallback payload carried by the
    /// outcome keeps this renderable even if the artifact is missing.
    fn artifact(&self, key: &str) -> String {
        self.cache.read(key).payload.to_text()
    }
}

/// Reject keys that could escape the content root. Runs before any store
/// access happens. Empty segments are rejected too, so a guarded key can
/// never be absolute or collapse under path joining.
pub(crate) fn guard_key(path: &str) -> Result<(), PageError> {
    if path.contains('\\') {
        return Err(PageError::InvalidPath);
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == ".." || segment == "." {
            return Err(PageError::InvalidPath);
        }
    }
    Ok(())
}
