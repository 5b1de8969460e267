//! Transport trait and types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailResult;
use crate::payload::SendPayload;

/// Provider response to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Provider message id.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// Handle to a provider-side mailing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingList {
    /// List address, `<name>@<domain>`.
    pub address: String,
}

/// Sends finished payloads.
///
/// Implementations report provider failures as they are; callers get no
/// retries or verification on top.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one message.
    async fn send(&self, payload: &SendPayload) -> MailResult<SendResponse>;

    /// Handle for the mailing list called `name`.
    fn list(&self, name: &str) -> MailingList;
}
