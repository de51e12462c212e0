//! Page scaffolding with explicit write-through persistence.
//!
//! # Design Decisions
//! - Config mutations persist through an explicit `set()`/`save()` call,
//!   never through implicit interception

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::resolver::engine::guard_key;

/// A freshly scaffolded page: its artifact paths plus a persisted config.
#[derive(Debug)]
pub struct PageScaffold {
    html_path: PathBuf,
    json_path: PathBuf,
    config: Value,
}

impl PageScaffold {
    /// Create the page directory and both artifacts under the site root.
    pub fn create(site_root: &Path, url: &str, title: &str) -> io::Result<Self> {
        let url = url.trim_start_matches('/');
        if url.is_empty() || guard_key(url).is_err() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid page url `{}`", url),
            ));
        }

        let dir = site_root.join("pages").join(url);
        fs::create_dir_all(&dir)?;

        let flat = url.replace('/', "_");
        let html_path = dir.join(format!("{}.html", flat));
        let json_path = dir.join(format!("{}.json", flat));

        let html = format!(
            "<div class=\"text-center\">\n<h1>{{title}}{}{{/title}}</h1>\n<a href=\"/home\">home</a>\n</div>\n",
            title
        );
        fs::write(&html_path, html)?;

        let config = serde_json::json!({ "title": title });
        let scaffold = Self {
            html_path,
            json_path,
            config,
        };
        scaffold.save()?;
        Ok(scaffold)
    }

    pub fn html_path(&self) -> &Path {
        &self.html_path
    }

    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Mutate one config key and persist immediately.
    pub fn set(&mut self, key: &str, value: Value) -> io::Result<()> {
        if let Value::Object(map) = &mut self.config {
            map.insert(key.to_string(), value);
        }
        self.save()
    }

    /// Persist the config artifact.
    pub fn save(&self) -> io::Result<()> {
        fs::write(
            &self.json_path,
            serde_json::to_string_pretty(&self.config)?,
        )
    }
}
