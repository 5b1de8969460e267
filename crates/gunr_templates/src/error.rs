//! Error types for templates.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Which list of a template config an asset key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Inline,
    Attachment,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Inline => write!(f, "inline asset"),
            AssetKind::Attachment => write!(f, "attachment"),
        }
    }
}

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Could NOT find root configuration \"{0}\"")]
    RootConfigNotFound(PathBuf),

    #[error("Could NOT find templates directory \"{0}\"")]
    TemplatesDirNotFound(PathBuf),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to resolve {kind} for key {key}.")]
    AssetNotFound { kind: AssetKind, key: String },

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Template rendering failed: {0}")]
    RenderingFailed(String),

    #[error("Rendered properties are no longer valid JSON: {0}")]
    PropertyRender(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
