//! Dispatch facade: load, render, assemble, send.

use std::sync::Arc;

use gunr_templates::{TemplateLoader, TemplateRenderer};
use serde_json::{Map, Value};
use tracing::info;

use crate::batch::{payload_to_batch, BatchOptions};
use crate::builder::build_payload;
use crate::error::MailResult;
use crate::payload::SendPayload;
use crate::transport::{MailingList, SendResponse, Transport};

/// Template-driven mailer.
///
/// The transport is constructed by the host and handed in; the mailer never
/// creates one on its own.
pub struct Mailer<T: Transport> {
    templates: TemplateLoader,
    renderer: TemplateRenderer,
    transport: Arc<T>,
}

impl<T: Transport> Mailer<T> {
    pub fn new(templates: TemplateLoader, transport: T) -> Self {
        Self::with_shared_transport(templates, Arc::new(transport))
    }

    /// Create a mailer over a transport the host also keeps a handle to.
    pub fn with_shared_transport(templates: TemplateLoader, transport: Arc<T>) -> Self {
        Self {
            templates,
            renderer: TemplateRenderer::new(),
            transport,
        }
    }

    pub fn templates(&self) -> &TemplateLoader {
        &self.templates
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Send a finished payload as is.
    pub async fn send(&self, payload: &SendPayload) -> MailResult<SendResponse> {
        info!("Sending message to {} recipients", payload.recipients().len());
        self.transport.send(payload).await
    }

    /// Load the template at `namespace` and build the payload it produces,
    /// without sending.
    pub async fn prepare(
        &self,
        namespace: &str,
        payload: SendPayload,
        template_data: Map<String, Value>,
    ) -> MailResult<SendPayload> {
        let template = self.templates.load(namespace).await?;
        build_payload(&self.renderer, template, payload, template_data)
    }

    /// Render the template at `namespace` into `payload` and send it.
    ///
    /// Nothing is sent if loading or rendering fails.
    pub async fn send_with_template(
        &self,
        namespace: &str,
        payload: SendPayload,
        template_data: Map<String, Value>,
    ) -> MailResult<SendResponse> {
        let payload = self.prepare(namespace, payload, template_data).await?;
        info!("Sending template {}", namespace);
        self.send(&payload).await
    }

    /// See [`payload_to_batch`].
    pub fn payload_to_batch(
        &self,
        payload: &SendPayload,
        options: impl Into<BatchOptions>,
    ) -> Vec<SendPayload> {
        payload_to_batch(payload, options)
    }

    /// Handle for the provider mailing list `name`.
    pub fn list(&self, name: &str) -> MailingList {
        self.transport.list(name)
    }
}
