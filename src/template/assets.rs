//! Script/style extraction.
//!
//! # Responsibilities
//! - Collect `<script>`/`<style>` spans out of a page body, in order
//! - Strip the spans from the HTML handed to the block renderer
//! - Enforce the legacy single-script rule
//!
//! # Design Decisions
//! - At most one `<script>` block per page body; more is a hard error,
//!   never a silent merge
//! - Styles have no count limit

use regex::Regex;
use thiserror::Error;

/// Rendering failures that abort a page render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("page body contains more than one <script> block")]
    MultipleScriptBlocks,
}

/// A page body with its out-of-band assets.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAssets {
    /// HTML with script/style spans removed.
    pub html: String,

    /// Inner text of each `<script>` span, document order.
    pub scripts: Vec<String>,

    /// Inner text of each `<style>` span, document order.
    pub styles: Vec<String>,
}

fn script_re() -> Regex {
    Regex::new(r"(?is)<script>(.*?)</script>").expect("script regex is valid")
}

fn style_re() -> Regex {
    Regex::new(r"(?is)<style>(.*?)</style>").expect("style regex is valid")
}

/// Check the single-script rule without touching the body.
pub fn validate_single_script(html: &str) -> Result<(), RenderError> {
    if script_re().captures_iter(html).count() > 1 {
        return Err(RenderError::MultipleScriptBlocks);
    }
    Ok(())
}

/// Pull script/style spans out of a page body.
pub fn extract_assets(html: &str) -> Result<ExtractedAssets, RenderError> {
    let script = script_re();
    let style = style_re();

    let scripts: Vec<String> = script
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect();
    if scripts.len() > 1 {
        return Err(RenderError::MultipleScriptBlocks);
    }

    let styles: Vec<String> = style
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect();

    let without_scripts = script.replace_all(html, "");
    let body = style.replace_all(&without_scripts, "").into_owned();

    Ok(ExtractedAssets {
        html: body,
        scripts,
        styles,
    })
}
