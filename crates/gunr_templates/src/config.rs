//! Root and per-template configuration.
//!
//! Both files are JSON. The root file (`.gunrrc` / `.gunrrc.json`) names the
//! templates directory and carries defaults; every template directory holds a
//! `config.json` whose values take precedence over those defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::merge::{overlay_option, replace_option, Overlay};

/// Named template properties as written in config files.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A documented property. The description never reaches render data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Value,
}

/// A property is either documented (`{"description": .., "value": ..}`) or a
/// bare value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Described(Property),
    Plain(Value),
}

impl PropertyValue {
    /// The value that ends up in render data.
    ///
    /// Objects without a `value` key and arrays have nothing to pluck and
    /// flatten to `null`.
    pub fn to_value(&self) -> Value {
        match self {
            PropertyValue::Described(property) => property.value.clone(),
            PropertyValue::Plain(Value::Object(_)) | PropertyValue::Plain(Value::Array(_)) => {
                Value::Null
            }
            PropertyValue::Plain(value) => value.clone(),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Plain(value)
    }
}

impl Overlay for PropertyValue {
    fn overlay(&mut self, other: Self) {
        match (self, other) {
            (PropertyValue::Described(existing), PropertyValue::Described(property)) => {
                replace_option(&mut existing.description, property.description);
                existing.value.overlay(property.value);
            }
            (PropertyValue::Plain(existing), PropertyValue::Plain(value)) => {
                existing.overlay(value)
            }
            (_, PropertyValue::Plain(Value::Null)) => {}
            (this, other) => *this = other,
        }
    }
}

/// Flatten properties into a name to value map.
pub fn to_key_value(properties: &Properties) -> Map<String, Value> {
    properties
        .iter()
        .map(|(name, property)| (name.clone(), property.to_value()))
        .collect()
}

/// Root configuration, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootConfig {
    /// Templates directory, relative to the config root.
    pub templates_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_props: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

/// Per-template `config.json`. Also the shape of the merged result once the
/// root defaults have been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Render `properties` against template data before merging them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_props: Option<bool>,
    /// Asset keys to send inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<Vec<String>>,
    /// Asset keys to send as attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    /// Default send data, filled in under whatever the caller sends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_data: Option<Map<String, Value>>,
}

impl From<&RootConfig> for TemplateConfig {
    /// Root defaults at template scope. `templatesDir` is dropped.
    fn from(root: &RootConfig) -> Self {
        Self {
            render_props: root.render_props,
            inline: None,
            attachments: None,
            properties: root.properties.clone(),
            send_data: root.send_data.clone(),
        }
    }
}

impl Overlay for TemplateConfig {
    fn overlay(&mut self, other: Self) {
        replace_option(&mut self.render_props, other.render_props);
        replace_option(&mut self.inline, other.inline);
        replace_option(&mut self.attachments, other.attachments);
        overlay_option(&mut self.properties, other.properties);
        overlay_option(&mut self.send_data, other.send_data);
    }
}

fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> TemplateResult<T> {
    serde_json::from_str(content).map_err(|source| TemplateError::InvalidConfig {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a JSON config file, blocking. Used at startup only.
pub fn read_config<T: DeserializeOwned>(path: &Path) -> TemplateResult<T> {
    debug!("Reading config from {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| TemplateError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(path, &content)
}

/// Read and parse a JSON config file.
pub async fn read_config_async<T: DeserializeOwned>(path: &Path) -> TemplateResult<T> {
    debug!("Reading config from {:?}", path);
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    parse_json(path, &content)
}
