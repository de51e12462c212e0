//! Route pattern compilation.
//!
//! # Responsibilities
//! - Parse `:name<type>` tokens out of declared patterns
//! - Translate tokens into typed capture groups
//! - Escape literal path text and anchor the final regex at both ends
//!
//! # Design Decisions
//! - Whole-path match (`^...$`), never prefix match
//! - Capture group order is token declaration order
//! - Duplicate token names within one pattern are a compile error

use regex::Regex;
use thiserror::Error;

use crate::routing::spec::{ParamType, RouteSpec, TemplateBinding};

/// Errors surfaced while compiling route declarations.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("route `{pattern}`: duplicate parameter name `{name}`")]
    DuplicateParam { pattern: String, name: String },

    #[error("route `{pattern}`: unknown parameter type `{ty}`")]
    UnknownType { pattern: String, ty: String },

    #[error("route `{pattern}`: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A route spec compiled into its runtime matcher.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    /// Anchored matcher with one capture group per declared token.
    pub matcher: Regex,

    /// Token names and types in declaration order.
    pub param_order: Vec<(String, ParamType)>,

    /// Canonical binding carried over from the spec.
    pub template: TemplateBinding,

    /// Original pattern, kept for logging.
    pub pattern: String,
}

/// Compile a set of route specs in declaration order.
pub fn compile(specs: &[RouteSpec]) -> Result<Vec<CompiledRoute>, CompileError> {
    specs.iter().map(compile_one).collect()
}

fn compile_one(spec: &RouteSpec) -> Result<CompiledRoute, CompileError> {
    // Token shape: `:name` or `:name<type>`.
    let token = Regex::new(r":(\w+)(?:<(\w+)>)?").expect("token regex is valid");

    let mut param_order: Vec<(String, ParamType)> = Vec::new();
    let mut pattern = String::from("^");
    let mut cursor = 0;

    for caps in token.captures_iter(&spec.path) {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = caps[1].to_string();

        let ty = match caps.get(2) {
            Some(ty_name) => ParamType::from_name(ty_name.as_str()).ok_or_else(|| {
                CompileError::UnknownType {
                    pattern: spec.path.clone(),
                    ty: ty_name.as_str().to_string(),
                }
            })?,
            None => ParamType::default(),
        };

        if param_order.iter().any(|(n, _)| n == &name) {
            return Err(CompileError::DuplicateParam {
                pattern: spec.path.clone(),
                name,
            });
        }

        pattern.push_str(&regex::escape(&spec.path[cursor..whole.start()]));
        pattern.push_str(ty.capture_class());
        cursor = whole.end();
        param_order.push((name, ty));
    }

    pattern.push_str(&regex::escape(&spec.path[cursor..]));
    pattern.push('$');

    let matcher = Regex::new(&pattern).map_err(|source| CompileError::BadPattern {
        pattern: spec.path.clone(),
        source,
    })?;

    Ok(CompiledRoute {
        matcher,
        param_order,
        template: spec.template.clone(),
        pattern: spec.path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(path: &str) -> RouteSpec {
        RouteSpec {
            path: path.to_string(),
            template: TemplateBinding::default(),
        }
    }

    #[test]
    fn test_typed_capture_classes() {
        let routes = compile(&[spec("/route/:q<int>")]).unwrap();
        assert!(routes[0].matcher.is_match("/route/42"));
        assert!(!routes[0].matcher.is_match("/route/abc"));
        assert!(!routes[0].matcher.is_match("/route/42/extra"));

        let routes = compile(&[spec("/price/:p<float>")]).unwrap();
        assert!(routes[0].matcher.is_match("/price/3.14"));
        assert!(!routes[0].matcher.is_match("/price/3"));

        let routes = compile(&[spec("/user/:name")]).unwrap();
        assert!(routes[0].matcher.is_match("/user/alice"));
        assert!(!routes[0].matcher.is_match("/user/alice/posts"));
    }

    #[test]
    fn test_anchored_whole_path() {
        let routes = compile(&[spec("/route/:q<int>")]).unwrap();
        assert!(!routes[0].matcher.is_match("/prefix/route/42"));
        assert!(!routes[0].matcher.is_match("/route/42suffix/"));
    }

    #[test]
    fn test_multiple_tokens_in_order() {
        let routes = compile(&[spec("/a/:x<int>/b/:y")]).unwrap();
        let order: Vec<_> = routes[0].param_order.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(order, vec!["x", "y"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = compile(&[spec("/a/:x/b/:x")]).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateParam { .. }));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = compile(&[spec("/a/:x<bool>")]).unwrap_err();
        assert!(matches!(err, CompileError::UnknownType { .. }));
    }

    #[test]
    fn test_untyped_token_defaults_to_string() {
        let routes = compile(&[spec("/user/:name")]).unwrap();
        assert_eq!(routes[0].param_order[0].1, ParamType::String);
    }
}
