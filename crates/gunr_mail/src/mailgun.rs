//! Mailgun HTTP transport.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::MailgunConfig;
use crate::error::{MailError, MailResult};
use crate::payload::{Attachment, SendPayload};
use crate::transport::{MailingList, SendResponse, Transport};

/// Transport posting to the Mailgun messages API.
pub struct MailgunTransport {
    config: MailgunConfig,
    client: reqwest::Client,
}

impl MailgunTransport {
    pub fn new(config: MailgunConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport from `MAILGUN_API_KEY` / `MAILGUN_API_DOMAIN`.
    pub fn from_env() -> MailResult<Self> {
        Ok(Self::new(MailgunConfig::from_env()?))
    }

    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }

    /// Build the multipart body, reading attachment files from disk.
    async fn build_form(&self, payload: &SendPayload) -> MailResult<Form> {
        let mut form = Form::new();
        for (name, value) in form_fields(payload)? {
            form = form.text(name, value);
        }
        for attachment in &payload.attachment {
            form = form.part("attachment", attachment_part(attachment).await?);
        }
        for inline in &payload.inline {
            form = form.part("inline", attachment_part(inline).await?);
        }
        Ok(form)
    }
}

async fn attachment_part(attachment: &Attachment) -> MailResult<Part> {
    let filename = attachment.filename();
    let part = match attachment {
        Attachment::Path(path) => Part::bytes(tokio::fs::read(path).await?).file_name(filename),
        Attachment::Data {
            data, content_type, ..
        } => {
            let part = Part::bytes(data.clone()).file_name(filename);
            match content_type {
                Some(mime) => part.mime_str(mime)?,
                None => part,
            }
        }
    };
    Ok(part)
}

fn push_all(fields: &mut Vec<(String, String)>, name: &str, values: &Option<Vec<String>>) {
    for value in values.iter().flatten() {
        fields.push((name.to_string(), value.clone()));
    }
}

fn push_opt(fields: &mut Vec<(String, String)>, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        fields.push((name.to_string(), value.clone()));
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text fields of the multipart body, in send order.
///
/// List-valued provider options (`o:tag`) repeat the field once per
/// element. `recipient-variables` and object-valued options are sent as JSON
/// strings. Template data is never sent.
pub fn form_fields(payload: &SendPayload) -> MailResult<Vec<(String, String)>> {
    let mut fields = Vec::new();
    push_opt(&mut fields, "from", &payload.from);
    push_all(&mut fields, "to", &payload.to);
    push_all(&mut fields, "cc", &payload.cc);
    push_all(&mut fields, "bcc", &payload.bcc);
    push_opt(&mut fields, "subject", &payload.subject);
    push_opt(&mut fields, "text", &payload.text);
    push_opt(&mut fields, "html", &payload.html);

    if let Some(vars) = &payload.recipient_variables {
        fields.push(("recipient-variables".to_string(), serde_json::to_string(vars)?));
    }

    for (name, value) in &payload.extra {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    fields.push((name.clone(), field_text(item)));
                }
            }
            other => fields.push((name.clone(), field_text(other))),
        }
    }

    Ok(fields)
}

#[async_trait]
impl Transport for MailgunTransport {
    async fn send(&self, payload: &SendPayload) -> MailResult<SendResponse> {
        if payload.recipients().is_empty() {
            return Err(MailError::InvalidPayload("no recipients in \"to\"".to_string()));
        }

        let url = self.config.messages_url();
        let form = self.build_form(payload).await?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.config.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let body: SendResponse = response.json().await?;
        info!(
            "Mailgun accepted message {} for {} recipients",
            body.id,
            payload.recipients().len()
        );
        Ok(body)
    }

    fn list(&self, name: &str) -> MailingList {
        MailingList {
            address: format!("{}@{}", name, self.config.api_domain),
        }
    }
}
