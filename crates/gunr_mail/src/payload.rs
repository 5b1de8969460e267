//! Outbound message payload.

use std::path::{Path, PathBuf};

use gunr_templates::merge::replace_option;
use gunr_templates::Overlay;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A file to attach, by path or in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attachment {
    Path(PathBuf),
    Data {
        filename: String,
        data: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
}

impl Attachment {
    /// File name reported to the provider.
    pub fn filename(&self) -> String {
        match self {
            Attachment::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Attachment::Data { filename, .. } => filename.clone(),
        }
    }
}

impl From<PathBuf> for Attachment {
    fn from(path: PathBuf) -> Self {
        Attachment::Path(path)
    }
}

impl From<&Path> for Attachment {
    fn from(path: &Path) -> Self {
        Attachment::Path(path.to_path_buf())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
        OneOrMany::One(address) => vec![address],
        OneOrMany::Many(addresses) => addresses,
    }))
}

/// Message data in the shape the Mailgun messages API expects.
///
/// Provider options (`o:tag`, `h:X-Header`, `v:var`, ...) live in `extra`.
/// `template_data` is only read while building from a template and is never
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub cc: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub bcc: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline: Vec<Attachment>,
    #[serde(
        rename = "recipient-variables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recipient_variables: Option<Map<String, Value>>,
    #[serde(
        rename = "templateData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub template_data: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SendPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to.get_or_insert_with(Vec::new).push(to.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Attach template data to the payload itself.
    pub fn with_template_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.template_data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set a provider option such as `o:tag` or `h:Reply-To`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Recipients in `to`, empty when unset.
    pub fn recipients(&self) -> &[String] {
        self.to.as_deref().unwrap_or_default()
    }

    /// Append attachments after any already present.
    pub fn add_attachment<I, A>(&mut self, attachments: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attachment>,
    {
        self.attachment.extend(attachments.into_iter().map(Into::into));
        self
    }

    /// Append inline attachments (e.g. images referenced by `cid:`) after any
    /// already present.
    pub fn add_inline<I, A>(&mut self, inline: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attachment>,
    {
        self.inline.extend(inline.into_iter().map(Into::into));
        self
    }
}

impl Overlay for SendPayload {
    /// `other` wins for every field it sets; lists it leaves empty keep the
    /// current value. Object-valued fields are replaced whole, never merged.
    fn overlay(&mut self, other: Self) {
        replace_option(&mut self.from, other.from);
        replace_option(&mut self.to, other.to);
        replace_option(&mut self.cc, other.cc);
        replace_option(&mut self.bcc, other.bcc);
        replace_option(&mut self.subject, other.subject);
        replace_option(&mut self.text, other.text);
        replace_option(&mut self.html, other.html);
        if !other.attachment.is_empty() {
            self.attachment = other.attachment;
        }
        if !other.inline.is_empty() {
            self.inline = other.inline;
        }
        replace_option(&mut self.recipient_variables, other.recipient_variables);
        replace_option(&mut self.template_data, other.template_data);
        self.extra.extend(other.extra);
    }
}
