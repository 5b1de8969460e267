//! Error types for mail operations.

use gunr_templates::TemplateError;
use thiserror::Error;

/// Result type alias for mail operations.
pub type MailResult<T> = Result<T, MailError>;

/// Errors that can occur while building or sending mail.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mailgun requires key \"{0}\" but was not found.")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Mailgun API error ({status}): {message}")]
    Transport { status: u16, message: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
