//! Placeholder-block renderer.
//!
//! # Responsibilities
//! - Scan templates once for flat `{name}...{/name}` block pairs
//! - Substitution mode: map value replaces the block, inner text is the
//!   default when the key is absent
//! - Conditional mode: truthy key keeps inner content, otherwise drops it
//! - `{json}` bulk merge into the parameter map
//! - Component include splicing with bounded recursion
//!
//! # Design Decisions
//! - Literal params take precedence over `{json}`-injected keys
//! - Duplicate block names refuse substitution (warn, leave untouched)
//! - No backreference regexes: open tags are scanned, close tags found by
//!   string search, which also keeps the pass linear

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde_json::Value;

/// Parameter map fed into a render pass. Values are JSON so typed route
/// params and `{json}` contents share one representation.
pub type ParamMap = BTreeMap<String, Value>;

/// Maximum component include nesting. The observed behavior had no cycle
/// guard; this bound is a deliberate hardening (see DESIGN.md).
pub const MAX_INCLUDE_DEPTH: usize = 8;

/// Compiled template renderer, shared across requests.
#[derive(Debug, Clone)]
pub struct Renderer {
    open_tag: Regex,
    include_tag: Regex,
    raw_tag: Regex,
}

/// One scanned `{name}...{/name}` pair.
#[derive(Debug)]
struct Block {
    name: String,
    /// Byte span of the whole block, delimiters included.
    start: usize,
    end: usize,
    /// Byte span of the inner text.
    inner_start: usize,
    inner_end: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            open_tag: Regex::new(r"\{([A-Za-z_]\w*)\}").expect("open tag regex is valid"),
            include_tag: Regex::new(
                r#"<template\s+include="([^"]+)"[^>]*?(?:/>|>\s*</template>)"#,
            )
            .expect("include tag regex is valid"),
            raw_tag: Regex::new(r"\{\{(\w+)\}\}").expect("raw tag regex is valid"),
        }
    }

    /// Substitution-mode render: blocks act as placeholder slots with
    /// inline defaults.
    pub fn substitute(&self, template: &str, params: &ParamMap) -> String {
        let blocks = self.scan_blocks(template);

        // {json} merge runs first so injected keys feed the generic pass.
        // Literal params win on collision.
        let mut merged: ParamMap = ParamMap::new();
        for block in &blocks {
            if block.name == "json" {
                let inner = &template[block.inner_start..block.inner_end];
                match serde_json::from_str::<Value>(inner) {
                    Ok(Value::Object(map)) => {
                        for (k, v) in map {
                            merged.insert(k, v);
                        }
                    }
                    Ok(_) | Err(_) => {
                        tracing::warn!("Ignoring {{json}} block with non-object or invalid JSON");
                    }
                }
            }
        }
        for (k, v) in params {
            merged.insert(k.clone(), v.clone());
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for block in &blocks {
            *counts.entry(block.name.as_str()).or_default() += 1;
        }

        let mut warned: HashSet<&str> = HashSet::new();
        let mut out = String::with_capacity(template.len());
        let mut cursor = 0;

        for block in &blocks {
            out.push_str(&template[cursor..block.start]);
            cursor = block.end;

            if block.name == "json" {
                // Span stripped; its contents already merged above.
                continue;
            }

            if counts[block.name.as_str()] > 1 {
                if warned.insert(block.name.as_str()) {
                    tracing::warn!(
                        name = %block.name,
                        "Duplicate template parameter, refusing substitution"
                    );
                }
                out.push_str(&template[block.start..block.end]);
                continue;
            }

            match merged.get(&block.name) {
                Some(value) => out.push_str(&value_text(value)),
                None => out.push_str(&template[block.inner_start..block.inner_end]),
            }
        }

        out.push_str(&template[cursor..]);
        out
    }

    /// Conditional-mode render (client context): truthy key keeps inner
    /// content, otherwise the block is dropped; then a plain `{key}` pass
    /// fills remaining single placeholders.
    pub fn conditional(&self, template: &str, params: &ParamMap) -> String {
        let blocks = self.scan_blocks(template);

        let mut out = String::with_capacity(template.len());
        let mut cursor = 0;
        for block in &blocks {
            out.push_str(&template[cursor..block.start]);
            cursor = block.end;
            if params.get(&block.name).map(truthy).unwrap_or(false) {
                out.push_str(&template[block.inner_start..block.inner_end]);
            }
        }
        out.push_str(&template[cursor..]);

        self.fill_single_placeholders(&out, params)
    }

    /// Client-side raw interpolation pass: `{{name}}`, unmatched keys left
    /// in place.
    pub fn raw_interpolate(&self, html: &str, params: &ParamMap) -> String {
        self.raw_tag
            .replace_all(html, |caps: &regex::Captures<'_>| {
                match params.get(&caps[1]) {
                    Some(value) => value_text(value),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Replace component include tags with resolved content, recursively,
    /// up to [`MAX_INCLUDE_DEPTH`]. Unresolvable or too-deep tags are left
    /// in place.
    pub fn splice_includes<F>(&self, template: &str, resolve: &F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.splice_at_depth(template, resolve, MAX_INCLUDE_DEPTH)
    }

    fn splice_at_depth<F>(&self, template: &str, resolve: &F, depth: usize) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.include_tag.is_match(template) {
            return template.to_string();
        }
        if depth == 0 {
            tracing::warn!("Component include depth limit reached, leaving tags unresolved");
            return template.to_string();
        }

        let mut out = String::with_capacity(template.len());
        let mut cursor = 0;
        for caps in self.include_tag.captures_iter(template) {
            let whole = caps.get(0).expect("capture 0 always present");
            let name = &caps[1];
            out.push_str(&template[cursor..whole.start()]);
            cursor = whole.end();

            match resolve(name) {
                Some(content) => {
                    out.push_str(&self.splice_at_depth(&content, resolve, depth - 1));
                }
                None => {
                    tracing::warn!(component = %name, "Component include did not resolve");
                    out.push_str(whole.as_str());
                }
            }
        }
        out.push_str(&template[cursor..]);
        out
    }

    /// Flat, non-overlapping scan: each open tag pairs with the nearest
    /// following `{/name}`; open tags without a close are not blocks.
    fn scan_blocks(&self, template: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.open_tag.find_at(template, pos) {
            let name = &template[m.start() + 1..m.end() - 1];
            let close = format!("{{/{}}}", name);
            match template[m.end()..].find(&close) {
                Some(rel) => {
                    let inner_end = m.end() + rel;
                    let end = inner_end + close.len();
                    blocks.push(Block {
                        name: name.to_string(),
                        start: m.start(),
                        end,
                        inner_start: m.end(),
                        inner_end,
                    });
                    pos = end;
                }
                None => {
                    pos = m.end();
                }
            }
        }

        blocks
    }

    fn fill_single_placeholders(&self, html: &str, params: &ParamMap) -> String {
        let bytes = html.as_bytes();
        let mut out = String::with_capacity(html.len());
        let mut cursor = 0;

        for m in self.open_tag.find_iter(html) {
            if m.start() < cursor {
                continue;
            }
            // Leave `{{name}}` spans for the raw interpolation pass.
            let doubled = (m.start() > 0 && bytes[m.start() - 1] == b'{')
                || (m.end() < bytes.len() && bytes[m.end()] == b'}');
            if doubled {
                continue;
            }

            out.push_str(&html[cursor..m.start()]);
            cursor = m.end();

            let name = &html[m.start() + 1..m.end() - 1];
            if let Some(value) = params.get(name) {
                out.push_str(&value_text(value));
            }
        }

        out.push_str(&html[cursor..]);
        out
    }
}

/// Render a JSON value as substitution text: strings unquoted, scalars via
/// their JSON form, null as empty.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// JS-style truthiness for conditional blocks.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_value_replaces_whole_block() {
        let r = Renderer::new();
        let out = r.substitute(
            "<h1>{title}Welcome{/title}</h1>",
            &params(&[("title", json!("Hi"))]),
        );
        assert_eq!(out, "<h1>Hi</h1>");
        assert!(!out.contains("Welcome"));
    }

    #[test]
    fn test_inner_text_is_default_when_absent() {
        let r = Renderer::new();
        let out = r.substitute("<h1>{title}Welcome{/title}</h1>", &ParamMap::new());
        assert_eq!(out, "<h1>Welcome</h1>");
    }

    #[test]
    fn test_duplicate_name_left_untouched() {
        let r = Renderer::new();
        let template = "{title}a{/title} and {title}b{/title}";
        let out = r.substitute(template, &params(&[("title", json!("X"))]));
        // Both occurrences stay verbatim; the render itself does not fail.
        assert_eq!(out, template);
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = Renderer::new();
        let p = params(&[("title", json!("Hi")), ("n", json!(3))]);
        let once = r.substitute("{title}t{/title}-{n}0{/n}", &p);
        let twice = r.substitute(&once, &p);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_json_block_merges_and_strips() {
        let r = Renderer::new();
        let template = r#"{json}{"greeting":"hello","n":2}{/json}<p>{greeting}x{/greeting} {n}0{/n}</p>"#;
        let out = r.substitute(template, &ParamMap::new());
        assert_eq!(out, "<p>hello 2</p>");
    }

    #[test]
    fn test_literal_params_win_over_json_block() {
        let r = Renderer::new();
        let template = r#"{json}{"title":"from json"}{/json}{title}d{/title}"#;
        let out = r.substitute(template, &params(&[("title", json!("literal"))]));
        assert_eq!(out, "literal");
    }

    #[test]
    fn test_invalid_json_block_is_ignored() {
        let r = Renderer::new();
        let out = r.substitute("{json}{broken{/json}<p>{t}d{/t}</p>", &ParamMap::new());
        assert_eq!(out, "<p>d</p>");
    }

    #[test]
    fn test_conditional_truthiness() {
        let r = Renderer::new();
        let template = "{active}ON{/active}{hidden}OFF{/hidden}";
        let out = r.conditional(
            template,
            &params(&[("active", json!(true)), ("hidden", json!(""))]),
        );
        assert_eq!(out, "ON");
    }

    #[test]
    fn test_conditional_fills_single_placeholders() {
        let r = Renderer::new();
        let out = r.conditional("<b>{name}</b>", &params(&[("name", json!("Ada"))]));
        assert_eq!(out, "<b>Ada</b>");
        // Absent keys become empty, raw {{x}} spans survive.
        let out = r.conditional("<b>{gone}</b>{{raw}}", &ParamMap::new());
        assert_eq!(out, "<b></b>{{raw}}");
    }

    #[test]
    fn test_raw_interpolation_leaves_unknown_keys() {
        let r = Renderer::new();
        let out = r.raw_interpolate("{{a}}-{{b}}", &params(&[("a", json!(1))]));
        assert_eq!(out, "1-{{b}}");
    }

    #[test]
    fn test_include_splicing_before_substitution() {
        let r = Renderer::new();
        let resolve = |name: &str| match name {
            "nav" => Some("<nav>menu</nav>".to_string()),
            _ => None,
        };
        let out = r.splice_includes(r#"<template include="nav"></template><main/>"#, &resolve);
        assert_eq!(out, "<nav>menu</nav><main/>");
    }

    #[test]
    fn test_nested_includes_resolve() {
        let r = Renderer::new();
        let resolve = |name: &str| match name {
            "outer" => Some(r#"[<template include="inner"/>]"#.to_string()),
            "inner" => Some("leaf".to_string()),
            _ => None,
        };
        let out = r.splice_includes(r#"<template include="outer"></template>"#, &resolve);
        assert_eq!(out, "[leaf]");
    }

    #[test]
    fn test_mutual_includes_hit_depth_bound() {
        let r = Renderer::new();
        let resolve = |name: &str| match name {
            "a" => Some(r#"<template include="b"></template>"#.to_string()),
            "b" => Some(r#"<template include="a"></template>"#.to_string()),
            _ => None,
        };
        // Must terminate, leaving an unresolved tag behind.
        let out = r.splice_includes(r#"<template include="a"></template>"#, &resolve);
        assert!(out.contains("<template include="));
    }

    #[test]
    fn test_unresolved_include_left_in_place() {
        let r = Renderer::new();
        let resolve = |_: &str| None;
        let tag = r#"<template include="ghost"></template>"#;
        assert_eq!(r.splice_includes(tag, &resolve), tag);
    }

    #[test]
    fn test_open_tag_without_close_is_not_a_block() {
        let r = Renderer::new();
        let out = r.substitute("{title} no close", &params(&[("title", json!("x"))]));
        assert_eq!(out, "{title} no close");
    }
}
