//! # gunr_mail
//!
//! Template-driven sending over Mailgun.
//!
//! # Features
//!
//! - **Template sends**: load a template by namespace, merge its defaults
//!   under the caller payload, attach its assets and render its body
//! - **Batch payloads**: fan a payload out into chunks of at most 1000
//!   recipients with per-recipient variables
//! - **Pluggable transport**: [`MailgunTransport`] for production,
//!   [`MockTransport`] for tests
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `MAILGUN_API_KEY` | Yes, unless passed explicitly | API key |
//! | `MAILGUN_API_DOMAIN` | Yes, unless passed explicitly | Sending domain |
//! | `MAILGUN_API_BASE` | No | API base URL (default `https://api.mailgun.net`) |
//! | `GUNR_ROOT` | No | Directory holding `.gunrrc` |
//!
//! # Example
//!
//! ```rust,no_run
//! use gunr_mail::{Mailer, MailgunTransport, SendPayload};
//! use gunr_templates::TemplateLoader;
//! use serde_json::Map;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mailer = Mailer::new(TemplateLoader::from_env()?, MailgunTransport::from_env()?);
//!
//!     let payload = SendPayload::new()
//!         .to("user@example.com")
//!         .with_template_data("name", "Ada");
//!
//!     let response = mailer.send_with_template("welcome", payload, Map::new()).await?;
//!     println!("Queued: {}", response.id);
//!
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod mailer;
pub mod mailgun;
pub mod mock;
pub mod payload;
pub mod transport;

pub use batch::{payload_to_batch, BatchOptions, RecipientExtensions, MAX_BATCH_SIZE};
pub use builder::build_payload;
pub use config::MailgunConfig;
pub use error::{MailError, MailResult};
pub use mailer::Mailer;
pub use mailgun::{form_fields, MailgunTransport};
pub use mock::{CapturedSend, MockTransport};
pub use payload::{Attachment, SendPayload};
pub use transport::{MailingList, SendResponse, Transport};
