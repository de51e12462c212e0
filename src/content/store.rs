//! Backing store readers.
//!
//! # Responsibilities
//! - Narrow read seam between the cache and whatever holds the artifacts
//! - FsStore: hierarchical directory tree rooted at the content directory
//! - BlobStore: flattened export blob (the KV deployment analogue)
//!
//! # Design Decisions
//! - Keys are store-relative, `/`-separated, never absolute
//! - NotFound is a distinct variant so callers can branch without string checks

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure modes of a raw store read.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource not found")]
    NotFound,

    #[error("storage error: {0}")]
    Io(String),
}

/// Read access to the content store.
pub trait StoreReader: Send + Sync + 'static {
    /// Load the raw text artifact at `key`.
    fn load(&self, key: &str) -> Result<String, StoreError>;
}

/// Directory-tree store rooted at the site content directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StoreReader for FsStore {
    fn load(&self, key: &str) -> Result<String, StoreError> {
        let path = self.root.join(key);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound,
            _ => StoreError::Io(e.to_string()),
        })
    }
}

/// In-memory store over a flattened site export (`pages.json`).
///
/// Blob keys like `home/home` expand to the same logical keys the
/// filesystem layout uses (`pages/home/home.html`, `pages/home/home.json`),
/// so the engine is oblivious to which deployment backs it.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    entries: HashMap<String, String>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an exported pages blob plus optional template map.
    pub fn from_export(
        pages: &serde_json::Value,
        templates: &HashMap<String, String>,
    ) -> Self {
        let mut store = Self::new();

        if let Some(map) = pages.as_object() {
            for (key, entry) in map {
                let (dir, flat) = match key.rsplit_once('/') {
                    Some((dir, flat)) => (dir.to_string(), flat.to_string()),
                    None => (key.clone(), key.clone()),
                };
                let html = entry
                    .get("html")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                store.insert(format!("pages/{}/{}.html", dir, flat), html.to_string());

                if let Some(config) = entry.get("config") {
                    store.insert(
                        format!("pages/{}/{}.json", dir, flat),
                        config.to_string(),
                    );
                }
            }
        }

        for (name, content) in templates {
            store.insert(format!("templates/{}", name), content.clone());
        }

        store
    }

    /// Load from an exported `pages.json` file.
    pub fn from_export_file(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound,
            _ => StoreError::Io(e.to_string()),
        })?;
        let pages: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self::from_export(&pages, &HashMap::new()))
    }

    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(key.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StoreReader for BlobStore {
    fn load(&self, key: &str) -> Result<String, StoreError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fs_store_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(matches!(
            store.load("pages/missing.html"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_fs_store_reads_relative_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages/home")).unwrap();
        fs::write(dir.path().join("pages/home/home.html"), "<p>hi</p>").unwrap();

        let store = FsStore::new(dir.path());
        assert_eq!(store.load("pages/home/home.html").unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_blob_store_expands_export_keys() {
        let blob = json!({
            "home/home": { "html": "<h1>Home</h1>", "config": { "title": "Home" } },
            "error/404/error_404": { "html": "<h1>404</h1>", "config": {} }
        });
        let store = BlobStore::from_export(&blob, &HashMap::new());

        assert_eq!(store.load("pages/home/home.html").unwrap(), "<h1>Home</h1>");
        let config: serde_json::Value =
            serde_json::from_str(&store.load("pages/home/home.json").unwrap()).unwrap();
        assert_eq!(config["title"], "Home");
        assert_eq!(
            store.load("pages/error/404/error_404.html").unwrap(),
            "<h1>404</h1>"
        );
    }
}
