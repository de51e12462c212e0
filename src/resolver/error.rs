//! Page resolution error taxonomy.

use thiserror::Error;

use crate::content::CacheError;
use crate::template::RenderError;

/// Everything that can go wrong while resolving a page.
///
/// `InvalidJson` and `TemplateParamConflict` are degraded conditions, not
/// request failures; they appear here so the taxonomy is complete, but the
/// engine recovers from them in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("invalid path")]
    InvalidPath,

    #[error("page not found")]
    PageNotFound,

    #[error("invalid JSON config")]
    InvalidJson,

    #[error("duplicate template parameter `{0}`")]
    TemplateParamConflict(String),

    #[error("page body contains more than one <script> block")]
    MultipleScriptBlocks,

    #[error("storage failure: {0}")]
    Io(String),
}

impl PageError {
    /// Machine-readable tag carried on the wire.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            PageError::InvalidPath => "InvalidPath",
            PageError::PageNotFound => "PageNotFound",
            PageError::InvalidJson => "InvalidJSON",
            PageError::TemplateParamConflict(_) => "TemplateParamConflict",
            PageError::MultipleScriptBlocks => "MultipleScriptBlocks",
            PageError::Io(_) => "IOError",
        }
    }

    /// HTTP status the transport layer should map this to.
    pub fn status(&self) -> u16 {
        match self {
            PageError::InvalidPath => 400,
            PageError::PageNotFound => 404,
            _ => 500,
        }
    }
}

impl From<CacheError> for PageError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::NotFound => PageError::PageNotFound,
            CacheError::InvalidJson => PageError::InvalidJson,
            CacheError::Io(msg) => PageError::Io(msg),
        }
    }
}

impl From<RenderError> for PageError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::MultipleScriptBlocks => PageError::MultipleScriptBlocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(PageError::InvalidPath.status(), 400);
        assert_eq!(PageError::PageNotFound.status(), 404);
        assert_eq!(PageError::Io("disk".into()).status(), 500);
        assert_eq!(PageError::MultipleScriptBlocks.status(), 500);
    }

    #[test]
    fn test_wire_tags() {
        assert_eq!(PageError::PageNotFound.wire_tag(), "PageNotFound");
        assert_eq!(PageError::InvalidJson.wire_tag(), "InvalidJSON");
        assert_eq!(PageError::Io("x".into()).wire_tag(), "IOError");
    }
}
