//! Wire contract shared between server and client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a resolved page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Rendered page HTML. Populated with fallback HTML even on failure so
    /// the client can always render a body.
    pub page: String,

    /// Page config object; empty when the page has none.
    #[serde(default)]
    pub config: Value,
}

/// Uniform result shape returned for every page request. Never thrown past
/// the resolver boundary; callers branch on `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub success: bool,

    /// Machine-readable error tag, absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub data: PageData,
}

impl PageResult {
    pub fn ok(page: String, config: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: PageData { page, config },
        }
    }

    pub fn failed(tag: impl Into<String>, page: String) -> Self {
        Self {
            success: false,
            error: Some(tag.into()),
            data: PageData {
                page,
                config: Value::Object(Default::default()),
            },
        }
    }
}
