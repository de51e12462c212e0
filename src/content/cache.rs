//! Memoizing read-through content cache.
//!
//! # Responsibilities
//! - Serve repeat reads from the memo table without I/O
//! - Decode `.json` keys into structured data, everything else as text
//! - Convert store failures into structured outcomes with fallback payloads
//!
//! # Design Decisions
//! - Memoized on success only; failed reads are retried on the next request
//! - `debug` mode bypasses lookups (every read hits the store) but still
//!   refreshes the memo table, for development against live files
//! - NotFound wins over the JSON/text distinction: the load fails before
//!   any parsing happens
//! - One warn-level log line per failure path, nothing on the hot path

use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;

use crate::content::store::{StoreError, StoreReader};

/// Fallback body handed out on missing resources so callers can always
/// render something.
pub const FALLBACK_404: &str = "<h1>404 not found</h1>";

/// Decoded cache payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    /// Text view used by callers that splice payloads into HTML. JSON
    /// payloads serialize compactly.
    pub fn to_text(&self) -> String {
        match self {
            Payload::Text(s) => s.clone(),
            Payload::Json(v) => v.to_string(),
        }
    }
}

/// Failure modes of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("resource not found")]
    NotFound,

    #[error("invalid JSON")]
    InvalidJson,

    #[error("storage error: {0}")]
    Io(String),
}

/// Structured result of a cached read. Callers branch on `success`;
/// `payload` is always renderable, even on failure.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub success: bool,
    pub payload: Payload,
    pub error: Option<CacheError>,
}

impl ReadOutcome {
    fn hit(payload: Payload) -> Self {
        Self {
            success: true,
            payload,
            error: None,
        }
    }

    fn miss(error: CacheError, fallback: Payload) -> Self {
        Self {
            success: false,
            payload: fallback,
            error: Some(error),
        }
    }
}

/// Process-lifetime memo table over a backing store.
///
/// No eviction: size is bounded by the number of distinct content files,
/// which is expected to stay small.
pub struct ContentCache {
    store: Box<dyn StoreReader>,
    entries: DashMap<String, Payload>,
    debug: bool,
}

impl ContentCache {
    /// Wrap a store reader. `debug` forces every read through to the store.
    pub fn new(store: impl StoreReader, debug: bool) -> Self {
        Self {
            store: Box::new(store),
            entries: DashMap::new(),
            debug,
        }
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read an artifact by logical key.
    pub fn read(&self, key: &str) -> ReadOutcome {
        if !self.debug {
            if let Some(hit) = self.entries.get(key) {
                return ReadOutcome::hit(hit.value().clone());
            }
        }

        let raw = match self.store.load(key) {
            Ok(raw) => raw,
            Err(StoreError::NotFound) => {
                tracing::warn!(key = %key, "Content not found");
                return ReadOutcome::miss(
                    CacheError::NotFound,
                    Payload::Text(FALLBACK_404.to_string()),
                );
            }
            Err(StoreError::Io(msg)) => {
                tracing::warn!(key = %key, error = %msg, "Content read failed");
                return ReadOutcome::miss(CacheError::Io(msg), Payload::Text(String::new()));
            }
        };

        let payload = if key.ends_with(".json") {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Payload::Json(value),
                Err(_) => {
                    tracing::warn!(key = %key, "Invalid JSON content");
                    return ReadOutcome::miss(
                        CacheError::InvalidJson,
                        Payload::Json(Value::Object(Default::default())),
                    );
                }
            }
        } else {
            Payload::Text(raw)
        };

        self.entries.insert(key.to_string(), payload.clone());
        ReadOutcome::hit(payload)
    }
}
