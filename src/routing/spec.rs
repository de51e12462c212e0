//! Route declarations and typed parameter values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a route parameter token (`:name<type>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Float,
    /// Default when the token carries no `<type>` suffix.
    #[default]
    String,
}

impl ParamType {
    /// Regex character class for this type's capture group.
    pub fn capture_class(self) -> &'static str {
        match self {
            ParamType::Int => r"(\d+)",
            ParamType::Float => r"(\d+\.\d+)",
            ParamType::String => r"([^/]+?)",
        }
    }

    /// Parse a declared type name. `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ParamType::Int),
            "float" => Some(ParamType::Float),
            "string" => Some(ParamType::String),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Int => write!(f, "int"),
            ParamType::Float => write!(f, "float"),
            ParamType::String => write!(f, "string"),
        }
    }
}

/// A typed parameter value extracted from a matched path.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl TypedValue {
    /// Convert captured text per the declared type.
    ///
    /// The capture classes already restrict the text, so failures are not
    /// expected; callers treat `None` as "no match" rather than an error.
    pub fn convert(raw: &str, ty: ParamType) -> Option<Self> {
        match ty {
            ParamType::Int => raw.parse::<i64>().ok().map(TypedValue::Int),
            ParamType::Float => raw.parse::<f64>().ok().map(TypedValue::Float),
            ParamType::String => Some(TypedValue::Str(raw.to_string())),
        }
    }

    /// JSON representation, used when values flow into render param maps.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TypedValue::Int(n) => serde_json::Value::from(*n),
            TypedValue::Float(x) => serde_json::Value::from(*x),
            TypedValue::Str(s) => serde_json::Value::from(s.clone()),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(n) => write!(f, "{}", n),
            TypedValue::Float(x) => write!(f, "{}", x),
            TypedValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Ordered map of capture name → typed value, produced per successful match.
pub type TypedParams = BTreeMap<String, TypedValue>;

/// Canonical template binding for a route family.
///
/// `params` associates a template placeholder name with the capture name
/// whose value fills it (`placeholder → capture`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateBinding {
    /// Canonical logical path, independent of the dynamic path that matched.
    pub path: String,

    /// Placeholder name → capture name.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// A declarative route family: dynamic pattern plus its canonical binding.
///
/// Wire-compatible with the JSON routes file:
/// `{ "path": "/route/:q<int>", "template": { "path": "/route", "params": { "query": "q" } } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Dynamic pattern with `:name<type>` tokens.
    pub path: String,

    /// Canonical content path and placeholder bindings.
    pub template: TemplateBinding,
}
