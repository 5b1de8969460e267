//! Integration tests for template sends and batching.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use gunr_mail::{
    Attachment, BatchOptions, MailError, Mailer, MockTransport, RecipientExtensions, SendPayload,
    Transport,
};
use gunr_templates::{TemplateError, TemplateLoader};
use serde_json::{json, Map, Value};
use tempfile::{tempdir, TempDir};

fn write_template(templates: &Path, relative: &str, config: Value, html: &str) {
    let dir = templates.join(relative);
    fs::create_dir_all(dir.join("assets")).unwrap();
    fs::write(dir.join("config.json"), config.to_string()).unwrap();
    fs::write(dir.join("html.hbs"), html).unwrap();
}

fn fixture() -> TempDir {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join(".gunrrc"),
        json!({"templatesDir": "templates", "sendData": {"from": "a@x.com"}}).to_string(),
    )
    .unwrap();

    let templates = temp.path().join("templates");
    write_template(
        &templates,
        "welcome",
        json!({"inline": ["logo"], "properties": {"title": {"value": "Welcome"}}}),
        "<h1>{{title}}</h1>",
    );
    fs::write(templates.join("welcome/assets/logo.png"), b"png").unwrap();

    write_template(
        &templates,
        "billing/receipt",
        json!({
            "renderProps": true,
            "attachments": ["receipt.pdf"],
            "sendData": {"subject": "Your receipt", "o:tag": ["billing"]},
            "properties": {
                "heading": {"description": "Shown at the top", "value": "Thanks {{name}}"}
            }
        }),
        "<h1>{{heading}}</h1><p>{{amount}}</p>",
    );
    fs::write(templates.join("billing/receipt/assets/receipt.pdf"), b"pdf").unwrap();

    write_template(
        &templates,
        "broken",
        json!({"inline": ["nope"]}),
        "",
    );

    temp
}

fn mailer(temp: &TempDir) -> (Mailer<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let loader = TemplateLoader::init(temp.path()).unwrap();
    (Mailer::new(loader, transport.clone()), transport)
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_welcome_end_to_end() -> anyhow::Result<()> {
    let temp = fixture();
    let (mailer, transport) = mailer(&temp);

    mailer
        .send_with_template("welcome", SendPayload::new().to("u@y.com"), Map::new())
        .await?;

    let sent = transport
        .last_payload()
        .ok_or_else(|| anyhow::anyhow!("nothing was sent"))?;
    assert_eq!(sent.from.as_deref(), Some("a@x.com"));
    assert_eq!(sent.recipients(), ["u@y.com".to_string()]);
    assert_eq!(
        sent.inline,
        vec![Attachment::Path(
            temp.path().join("templates/welcome/assets/logo.png")
        )]
    );
    assert_eq!(sent.html.as_deref(), Some("<h1>Welcome</h1>"));
    assert!(sent.template_data.is_none());
    Ok(())
}

#[tokio::test]
async fn test_receipt_renders_properties() {
    let temp = fixture();
    let (mailer, transport) = mailer(&temp);

    let payload = SendPayload::new()
        .to("u@y.com")
        .with_template_data("name", "Ada");
    mailer
        .send_with_template(
            "billing.receipt",
            payload,
            object(json!({"amount": "12.00"})),
        )
        .await
        .unwrap();

    let sent = transport.last_payload().unwrap();
    assert_eq!(sent.html.as_deref(), Some("<h1>Thanks Ada</h1><p>12.00</p>"));
    assert_eq!(sent.subject.as_deref(), Some("Your receipt"));
    assert_eq!(sent.from.as_deref(), Some("a@x.com"));
    assert_eq!(sent.extra["o:tag"], json!(["billing"]));
    assert_eq!(sent.attachment.len(), 1);
    assert_eq!(sent.attachment[0].filename(), "receipt.pdf");
}

#[tokio::test]
async fn test_unresolved_asset_sends_nothing() {
    let temp = fixture();
    let (mailer, transport) = mailer(&temp);

    let err = mailer
        .send_with_template("broken", SendPayload::new().to("u@y.com"), Map::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to resolve inline asset for key nope.");
    assert!(matches!(
        err,
        MailError::Template(TemplateError::AssetNotFound { .. })
    ));
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_forwarded() {
    let temp = fixture();
    let transport = MockTransport::new().simulate_failure(400, "'to' parameter is not a valid address");
    let mailer = Mailer::new(TemplateLoader::init(temp.path()).unwrap(), transport);

    let err = mailer
        .send_with_template("welcome", SendPayload::new().to("nope"), Map::new())
        .await
        .unwrap_err();

    match err {
        MailError::Transport { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "'to' parameter is not a valid address");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_batch_then_send() {
    let temp = fixture();
    let (mailer, transport) = mailer(&temp);

    let recipients: Vec<String> = (0..2500).map(|i| format!("r{}@y.com", i)).collect();
    let template = mailer
        .prepare("welcome", SendPayload::new(), Map::new())
        .await
        .unwrap();
    let batch = mailer.payload_to_batch(&template, recipients.clone());

    let sizes: Vec<usize> = batch.iter().map(|p| p.recipients().len()).collect();
    assert_eq!(sizes, vec![1000, 1000, 500]);

    for payload in &batch {
        mailer.send(payload).await.unwrap();
    }
    assert_eq!(transport.sent_count(), 3);

    let sent: Vec<String> = transport
        .captured()
        .into_iter()
        .flat_map(|c| c.payload.to.unwrap_or_default())
        .collect();
    assert_eq!(sent, recipients);

    let uids: HashSet<String> = batch
        .iter()
        .flat_map(|p| p.recipient_variables.clone().unwrap_or_default())
        .map(|(_, vars)| vars["uid"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(uids.len(), 2500);
}

#[test]
fn test_batch_extend_only() {
    let payload = SendPayload::new()
        .to("a@x.com")
        .to("b@x.com")
        .subject("%recipient.greeting%");

    let mut extend = RecipientExtensions::new();
    extend.insert("b@x.com".to_string(), object(json!({"greeting": "Hey Bea"})));

    let batch = gunr_mail::payload_to_batch(&payload, extend.clone());
    let explicit =
        gunr_mail::payload_to_batch(&payload, BatchOptions::new().extend(extend));

    for batch in [batch, explicit] {
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].recipients(), payload.recipients());
        let vars = batch[0].recipient_variables.as_ref().unwrap();
        assert_eq!(vars["b@x.com"]["greeting"], "Hey Bea");
        assert!(vars["a@x.com"]["uid"].is_string());
    }
}

#[test]
fn test_list_handle() {
    let temp = fixture();
    let transport = MockTransport::new().with_domain("mg.gunr.dev");
    assert_eq!(transport.list("newsletter").address, "newsletter@mg.gunr.dev");

    let mailer = Mailer::new(TemplateLoader::init(temp.path()).unwrap(), transport);
    assert_eq!(mailer.list("newsletter").address, "newsletter@mg.gunr.dev");
}
