//! Mock transport for testing.
//!
//! Records every payload it is handed and answers with queued responses,
//! so the send pipeline can be tested without network access.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{MailError, MailResult};
use crate::payload::SendPayload;
use crate::transport::{MailingList, SendResponse, Transport};

/// A payload captured by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct CapturedSend {
    pub payload: SendPayload,
    pub sent_at: DateTime<Utc>,
}

/// Mock transport for testing.
#[derive(Clone)]
pub struct MockTransport {
    domain: String,
    /// Responses returned in order; a default response once exhausted.
    responses: Arc<RwLock<VecDeque<SendResponse>>>,
    captured: Arc<RwLock<Vec<CapturedSend>>>,
    /// Simulated provider failure (status, message).
    failure: Arc<RwLock<Option<(u16, String)>>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            domain: "mg.example.com".to_string(),
            responses: Arc::new(RwLock::new(VecDeque::new())),
            captured: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Queue a response for the next send.
    pub fn add_response(self, response: SendResponse) -> Self {
        self.responses.write().push_back(response);
        self
    }

    /// Fail every send with the given status and message.
    pub fn simulate_failure(self, status: u16, message: impl Into<String>) -> Self {
        *self.failure.write() = Some((status, message.into()));
        self
    }

    /// Payloads sent so far, oldest first. Failed sends are included.
    pub fn captured(&self) -> Vec<CapturedSend> {
        self.captured.read().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.captured.read().len()
    }

    pub fn last_payload(&self) -> Option<SendPayload> {
        self.captured.read().last().map(|c| c.payload.clone())
    }

    /// Clear captured sends.
    pub fn reset(&self) {
        self.captured.write().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, payload: &SendPayload) -> MailResult<SendResponse> {
        self.captured.write().push(CapturedSend {
            payload: payload.clone(),
            sent_at: Utc::now(),
        });

        if let Some((status, message)) = self.failure.read().clone() {
            return Err(MailError::Transport { status, message });
        }

        let queued = self.responses.write().pop_front();
        Ok(queued.unwrap_or_else(|| SendResponse {
            id: format!("<{}@{}>", Uuid::new_v4().simple(), self.domain),
            message: "Queued. Thank you.".to_string(),
        }))
    }

    fn list(&self, name: &str) -> MailingList {
        MailingList {
            address: format!("{}@{}", name, self.domain),
        }
    }
}
