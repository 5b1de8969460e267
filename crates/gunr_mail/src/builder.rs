//! Payload assembly from a loaded template.

use gunr_templates::{LoadedTemplate, Overlay, TemplateRenderer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::MailResult;
use crate::payload::SendPayload;

/// Merge template defaults, caller payload and template data into a finished
/// payload.
///
/// Order of precedence, highest first:
/// - `template_data`, then data embedded in `payload.template_data`
/// - the caller payload over the template's `sendData`
/// - template data over (optionally rendered) template properties
///
/// Template inline assets and attachments are appended after any the caller
/// already listed. The HTML body always comes from the template; a caller
/// `text` body is rendered with the same data.
pub fn build_payload(
    renderer: &TemplateRenderer,
    template: LoadedTemplate,
    mut payload: SendPayload,
    template_data: Map<String, Value>,
) -> MailResult<SendPayload> {
    let mut data = payload.template_data.take().unwrap_or_default();
    data.extend(template_data);

    let defaults: SendPayload = match template.send_data {
        Some(ref send_data) => serde_json::from_value(Value::Object(send_data.clone()))?,
        None => SendPayload::default(),
    };
    let mut payload = defaults.overlaid(payload);
    payload.template_data = None;

    payload.add_inline(template.inline.iter().map(|p| p.as_path()));
    payload.add_attachment(template.attachments.iter().map(|p| p.as_path()));

    let properties = if template.renders_properties() {
        renderer.render_properties(&template.properties, &data)?
    } else {
        template.properties
    };

    let mut context = properties;
    context.extend(data);

    payload.html = Some(renderer.render(&template.html, &context)?);
    if let Some(text) = payload.text.take() {
        payload.text = Some(renderer.render(&text, &context)?);
    }

    debug!(
        "Built payload from template {} ({} inline, {} attachments)",
        template.namespace,
        payload.inline.len(),
        payload.attachment.len()
    );
    Ok(payload)
}
