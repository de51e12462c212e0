//! Client page loader.
//!
//! # Responsibilities
//! - Fetch resolved pages over the wire contract
//! - Re-run route matching for client-side `{{name}}` interpolation
//! - Walk "derive" composition chains into ordered frames
//! - Memoize fetched templates like the browser loader does
//!
//! # Design Decisions
//! - Derive chains are depth-bounded (hardening over the observed
//!   behavior, which had no cycle guard)
//! - A derive ancestor is skipped when the current path already lives
//!   under it, matching the in-browser navigation shortcut

use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::resolver::PageResult;
use crate::routing::RouteTable;
use crate::template::{extract_assets, ParamMap, RenderError, Renderer};

/// Maximum derive-chain nesting before the loader gives up.
pub const MAX_DERIVE_DEPTH: usize = 8;

/// Default container frames render into when no derive directive applies.
const ROOT_CONTAINER: &str = "app";

/// Failures surfaced by the loader.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("wire decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("derive chain exceeds depth limit")]
    DeriveTooDeep,
}

/// One renderable unit: which container it goes into and what goes there.
#[derive(Debug, Clone)]
pub struct Frame {
    pub path: String,
    pub container: String,
    pub html: String,
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub config: Value,
    pub success: bool,
    pub error: Option<String>,
}

/// A fully composed navigation target: frames in install order,
/// outermost ancestor first.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub frames: Vec<Frame>,
}

impl ComposedPage {
    /// The navigation target itself (innermost frame).
    pub fn leaf(&self) -> &Frame {
        self.frames.last().expect("composed page has at least one frame")
    }
}

/// SPA page loader speaking the server's wire contract.
pub struct PageClient {
    base: Url,
    http: reqwest::Client,
    routes: RouteTable,
    renderer: Renderer,
    templates: DashMap<String, String>,
}

impl PageClient {
    /// `base` is the server origin, e.g. `http://127.0.0.1:5000/`.
    pub fn new(base: Url, routes: RouteTable) -> Self {
        Self {
            base,
            http: reqwest::Client::new(),
            routes,
            renderer: Renderer::new(),
            templates: DashMap::new(),
        }
    }

    /// Fetch the raw wire result for one path.
    pub async fn fetch(&self, path: &str) -> Result<PageResult, ClientError> {
        let url = self
            .base
            .join(&format!("pages/{}", path.trim_start_matches('/')))
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        // Failure statuses still carry a renderable wire body.
        response
            .json::<PageResult>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Fetch a template by name, memoized for the loader's lifetime.
    pub async fn fetch_template(&self, name: &str) -> Result<Option<String>, ClientError> {
        if let Some(hit) = self.templates.get(name) {
            return Ok(Some(hit.value().clone()));
        }

        let url = self
            .base
            .join(&format!("templates/{}", name))
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if body["success"] != Value::Bool(true) {
            return Ok(None);
        }
        let content = match &body["data"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.templates.insert(name.to_string(), content.clone());
        Ok(Some(content))
    }

    /// Fetch the navigation chrome and conditional-render it against a
    /// page-supplied map.
    pub async fn navigation(&self, render_map: &ParamMap) -> Result<(String, String), ClientError> {
        let url = self
            .base
            .join("navigation")
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let body: Value = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let nav = body["data"]["nav"].as_str().unwrap_or_default();
        let menu = body["data"]["menu"].as_str().unwrap_or_default();
        Ok((
            self.renderer.conditional(nav, render_map),
            self.renderer.conditional(menu, render_map),
        ))
    }

    /// Load and compose a navigation target.
    pub async fn load(&self, path: &str) -> Result<ComposedPage, ClientError> {
        self.load_from(path, None).await
    }

    /// Load with the currently displayed path, enabling the derive
    /// shortcut: an ancestor already on screen is not refetched.
    pub async fn load_from(
        &self,
        path: &str,
        current: Option<&str>,
    ) -> Result<ComposedPage, ClientError> {
        let mut frames = Vec::new();
        self.compose(path, ROOT_CONTAINER, current, MAX_DERIVE_DEPTH, &mut frames)
            .await?;
        Ok(ComposedPage { frames })
    }

    async fn compose(
        &self,
        path: &str,
        container: &str,
        current: Option<&str>,
        depth: usize,
        frames: &mut Vec<Frame>,
    ) -> Result<(), ClientError> {
        if depth == 0 {
            return Err(ClientError::DeriveTooDeep);
        }

        let result = self.fetch(path).await?;

        if let Some((super_path, derive_container)) = derive_directive(&result.data.config) {
            let ancestor_current = current
                .map(|c| c.starts_with(super_path.as_str()) && c != path)
                .unwrap_or(false);
            if !ancestor_current {
                Box::pin(self.compose(
                    &super_path,
                    ROOT_CONTAINER,
                    current,
                    depth - 1,
                    frames,
                ))
                .await?;
            }
            frames.push(self.frame(path, &derive_container, result)?);
            return Ok(());
        }

        frames.push(self.frame(path, container, result)?);
        Ok(())
    }

    fn frame(&self, path: &str, container: &str, result: PageResult) -> Result<Frame, ClientError> {
        let assets = extract_assets(&result.data.page)?;

        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let params: ParamMap = self
            .routes
            .match_path(&normalized)
            .map(|m| {
                m.bindings
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect()
            })
            .unwrap_or_default();

        let html = self.renderer.raw_interpolate(&assets.html, &params);

        Ok(Frame {
            path: path.to_string(),
            container: container.to_string(),
            html,
            scripts: assets.scripts,
            styles: assets.styles,
            config: result.data.config,
            success: result.success,
            error: result.error,
        })
    }
}

/// Read a derive directive out of a page config:
/// `{ "loadData": { "method": "derive", "super": "/parent", "deriveContainer": "panel" } }`.
fn derive_directive(config: &Value) -> Option<(String, String)> {
    let load = config.get("loadData")?;
    if load.get("method")?.as_str()? != "derive" {
        return None;
    }
    let super_path = load.get("super")?.as_str()?.to_string();
    let container = load
        .get("deriveContainer")
        .and_then(|v| v.as_str())
        .unwrap_or(ROOT_CONTAINER)
        .to_string();
    Some((super_path, container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derive_directive_parsing() {
        let config = json!({
            "loadData": { "method": "derive", "super": "/docs", "deriveContainer": "panel" }
        });
        assert_eq!(
            derive_directive(&config),
            Some(("/docs".to_string(), "panel".to_string()))
        );

        assert_eq!(derive_directive(&json!({})), None);
        assert_eq!(
            derive_directive(&json!({ "loadData": { "method": "replace" } })),
            None
        );
        // Missing container falls back to the root container.
        assert_eq!(
            derive_directive(&json!({ "loadData": { "method": "derive", "super": "/d" } })),
            Some(("/d".to_string(), "app".to_string()))
        );
    }
}
