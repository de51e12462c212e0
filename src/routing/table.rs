//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Scan candidates in declaration order, return the first structural match
//! - Extract typed parameters and canonical placeholder bindings
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins for compatibility with overlapping patterns
//! - Conversion failure on an otherwise structural match skips the route

use std::collections::BTreeMap;

use crate::routing::compiler::{compile, CompileError, CompiledRoute};
use crate::routing::spec::{RouteSpec, TypedParams, TypedValue};

/// Immutable table of compiled routes, shared across requests.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

/// Result of a successful match against the table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Canonical logical path declared by the matched route's template.
    pub canonical_path: String,

    /// Capture name → typed value, in capture order.
    pub params: TypedParams,

    /// Placeholder name → typed value, per the route's binding table.
    pub bindings: BTreeMap<String, TypedValue>,
}

impl RouteTable {
    /// Compile route specs into a frozen table.
    pub fn compile(specs: &[RouteSpec]) -> Result<Self, CompileError> {
        Ok(Self {
            routes: compile(specs)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Match a logical path (leading slash expected) against the table.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if let Some(m) = try_match(route, path) {
                return Some(m);
            }
        }
        None
    }
}

fn try_match(route: &CompiledRoute, path: &str) -> Option<RouteMatch> {
    let caps = route.matcher.captures(path)?;

    let mut params = TypedParams::new();
    for (i, (name, ty)) in route.param_order.iter().enumerate() {
        let raw = caps.get(i + 1)?.as_str();
        // Fail closed on conversion errors rather than panicking.
        let value = TypedValue::convert(raw, *ty)?;
        params.insert(name.clone(), value);
    }

    let mut bindings = BTreeMap::new();
    for (placeholder, capture) in &route.template.params {
        if let Some(value) = params.get(capture) {
            bindings.insert(placeholder.clone(), value.clone());
        } else {
            tracing::warn!(
                pattern = %route.pattern,
                placeholder = %placeholder,
                capture = %capture,
                "Route binding references unknown capture"
            );
        }
    }

    Some(RouteMatch {
        canonical_path: route.template.path.clone(),
        params,
        bindings,
    })
}
