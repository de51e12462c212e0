//! Site export pipeline.
//!
//! # Responsibilities
//! - Flatten the pages tree into a single `pages.json` blob
//! - Emit `navigation.json` (nav/menu templates) and `routes.json`
//! - Copy static assets and the SPA shell into the output directory
//!
//! # Design Decisions
//! - Blob keys are `<path>/<flattened>` (no extension); `BlobStore`
//!   expands them back into the logical keys the engine uses, so the
//!   exported deployment serves identical content

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routing::RouteSpec;

/// One flattened page artifact pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedPage {
    pub html: String,
    #[serde(default)]
    pub config: Value,
}

/// Counters reported after an export run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportSummary {
    pub pages: usize,
    pub templates: usize,
}

/// Walk the pages tree into blob entries keyed `<path>/<flattened>`.
pub fn flatten_pages(pages_dir: &Path) -> io::Result<BTreeMap<String, ExportedPage>> {
    let mut out = BTreeMap::new();
    walk(pages_dir, "", &mut out)?;
    Ok(out)
}

fn walk(dir: &Path, base: &str, out: &mut BTreeMap<String, ExportedPage>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            let child = if base.is_empty() {
                name
            } else {
                format!("{}/{}", base, name)
            };
            walk(&path, &child, out)?;
        } else if let Some(stem) = name.strip_suffix(".html") {
            let html = fs::read_to_string(&path)?;
            let config = fs::read_to_string(path.with_extension("json"))
                .ok()
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_else(|| Value::Object(Default::default()));

            let key = if base.is_empty() {
                stem.to_string()
            } else {
                format!("{}/{}", base, stem)
            };
            out.insert(key, ExportedPage { html, config });
        }
    }
    Ok(())
}

/// Export a site directory into a deployable flat layout.
pub fn export_site(
    site_root: &Path,
    routes: &[RouteSpec],
    out_dir: &Path,
) -> io::Result<ExportSummary> {
    let data_dir = out_dir.join("_data");
    fs::create_dir_all(&data_dir)?;

    let pages = flatten_pages(&site_root.join("pages"))?;
    fs::write(
        data_dir.join("pages.json"),
        serde_json::to_string_pretty(&pages)?,
    )?;

    let read_template = |name: &str| {
        fs::read_to_string(site_root.join("templates").join(name)).unwrap_or_default()
    };
    let nav = read_template("nav.html");
    let menu = read_template("menu.html");
    let templates = usize::from(!nav.is_empty()) + usize::from(!menu.is_empty());
    fs::write(
        data_dir.join("navigation.json"),
        serde_json::to_string_pretty(&serde_json::json!({ "nav": nav, "menu": menu }))?,
    )?;

    fs::write(
        data_dir.join("routes.json"),
        serde_json::to_string_pretty(routes)?,
    )?;

    copy_dir(&site_root.join("static"), &out_dir.join("static"))?;
    copy_dir(&site_root.join("data"), &out_dir.join("data"))?;
    let index = site_root.join("index.html");
    if index.exists() {
        fs::copy(&index, out_dir.join("index.html"))?;
    }

    Ok(ExportSummary {
        pages: pages.len(),
        templates,
    })
}

fn copy_dir(src: &Path, dest: &Path) -> io::Result<()> {
    if !src.exists() {
        return Ok(());
    }
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
