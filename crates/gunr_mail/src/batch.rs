//! Batch sending: one payload per chunk of recipients.
//!
//! Mailgun personalises batch messages through `recipient-variables`, e.g. a
//! payload with `subject: "%recipient.subject%"` and
//!
//! ```json
//! { "user@email.com": { "subject": "unique subject line", "name": "Recipient Name" } }
//! ```
//!
//! as extension data.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::payload::SendPayload;

/// Recipients per message accepted by Mailgun.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Recipient variable holding the generated tracking token.
pub const UID_KEY: &str = "uid";

/// Per-recipient extension data, keyed by address.
pub type RecipientExtensions = BTreeMap<String, Map<String, Value>>;

/// Options for [`payload_to_batch`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Recipients to fan out to. `None` uses the payload's `to`.
    pub recipients: Option<Vec<String>>,
    pub extend: RecipientExtensions,
    /// Recipients per payload, clamped to `1..=MAX_BATCH_SIZE`.
    pub chunk_size: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            recipients: None,
            extend: RecipientExtensions::new(),
            chunk_size: MAX_BATCH_SIZE,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = Some(recipients);
        self
    }

    pub fn extend(mut self, extend: RecipientExtensions) -> Self {
        self.extend = extend;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl From<Vec<String>> for BatchOptions {
    fn from(recipients: Vec<String>) -> Self {
        Self::new().recipients(recipients)
    }
}

/// Extension data alone: recipients come from the payload's `to`.
impl From<RecipientExtensions> for BatchOptions {
    fn from(extend: RecipientExtensions) -> Self {
        Self::new().extend(extend)
    }
}

impl From<(Vec<String>, RecipientExtensions)> for BatchOptions {
    fn from((recipients, extend): (Vec<String>, RecipientExtensions)) -> Self {
        Self::new().recipients(recipients).extend(extend)
    }
}

/// Generate a tracking token for one recipient.
pub fn generate_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Split `payload` into one clone per chunk of recipients.
///
/// Each clone's `to` is its chunk, and its `recipient-variables` map every
/// recipient in the chunk to its extension data plus a fresh `uid`.
pub fn payload_to_batch(payload: &SendPayload, options: impl Into<BatchOptions>) -> Vec<SendPayload> {
    let options = options.into();
    let recipients = options
        .recipients
        .unwrap_or_else(|| payload.recipients().to_vec());
    let chunk_size = options.chunk_size.clamp(1, MAX_BATCH_SIZE);

    let batch: Vec<SendPayload> = recipients
        .chunks(chunk_size)
        .map(|chunk| {
            let variables = chunk
                .iter()
                .map(|recipient| {
                    let mut vars = options.extend.get(recipient).cloned().unwrap_or_default();
                    vars.insert(UID_KEY.to_string(), Value::String(generate_uid()));
                    (recipient.clone(), Value::Object(vars))
                })
                .collect::<Map<String, Value>>();

            let mut clone = payload.clone();
            clone.to = Some(chunk.to_vec());
            clone.recipient_variables = Some(variables);
            clone
        })
        .collect();

    debug!(
        "Split {} recipients into {} batch payloads",
        recipients.len(),
        batch.len()
    );
    batch
}
