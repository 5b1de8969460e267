//! Template loading functionality.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{read_config_async, to_key_value, TemplateConfig};
use crate::error::{AssetKind, TemplateError, TemplateResult};
use crate::merge::Overlay;
use crate::registry::RegistryEntry;
use crate::resolver::{ConfigResolver, ResolvedConfig};

/// A template ready for rendering. Built fresh on every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedTemplate {
    pub namespace: String,
    /// Raw `html.hbs` content.
    pub html: String,
    pub render_props: Option<bool>,
    /// Absolute paths of inline assets.
    pub inline: Vec<PathBuf>,
    /// Absolute paths of attachments.
    pub attachments: Vec<PathBuf>,
    /// Flattened properties, name to value.
    pub properties: Map<String, Value>,
    /// Default send data from root and template config.
    pub send_data: Option<Map<String, Value>>,
}

impl LoadedTemplate {
    /// Whether properties are rendered against template data before use.
    pub fn renders_properties(&self) -> bool {
        self.render_props.unwrap_or(false)
    }
}

/// Template loader.
///
/// Owns the startup configuration. `load` reads from disk every time; there
/// is no cache.
pub struct TemplateLoader {
    config: ResolvedConfig,
}

impl TemplateLoader {
    /// Create a new template loader.
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    /// Resolve the config rooted at `root` and build a loader over it.
    pub fn init(root: impl Into<PathBuf>) -> TemplateResult<Self> {
        Ok(Self::new(ConfigResolver::new(root).resolve()?))
    }

    /// Resolve the config from the environment and build a loader over it.
    pub fn from_env() -> TemplateResult<Self> {
        Ok(Self::new(ConfigResolver::from_env()?.resolve()?))
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Load a template by namespace.
    pub async fn load(&self, namespace: &str) -> TemplateResult<LoadedTemplate> {
        let entry = self
            .config
            .registry
            .get(namespace)
            .ok_or_else(|| TemplateError::NotFound(namespace.to_string()))?;

        debug!("Loading template {} from {:?}", namespace, entry.path);

        let template_config: TemplateConfig = read_config_async(&entry.config_path()).await?;
        let merged =
            TemplateConfig::from(&self.config.root_config).overlaid(template_config);

        let html_path = entry.html_path();
        let html = tokio::fs::read_to_string(&html_path)
            .await
            .map_err(|source| TemplateError::ReadFailed {
                path: html_path,
                source,
            })?;

        let inline = resolve_assets(entry, merged.inline.as_deref(), AssetKind::Inline)?;
        let attachments =
            resolve_assets(entry, merged.attachments.as_deref(), AssetKind::Attachment)?;

        let properties = merged
            .properties
            .as_ref()
            .map(to_key_value)
            .unwrap_or_default();

        Ok(LoadedTemplate {
            namespace: namespace.to_string(),
            html,
            render_props: merged.render_props,
            inline,
            attachments,
            properties,
            send_data: merged.send_data,
        })
    }
}

/// Map asset keys to absolute paths. Fails on the first unknown key.
fn resolve_assets(
    entry: &RegistryEntry,
    keys: Option<&[String]>,
    kind: AssetKind,
) -> TemplateResult<Vec<PathBuf>> {
    keys.unwrap_or_default()
        .iter()
        .map(|key| {
            entry
                .asset(key)
                .map(|path| path.to_path_buf())
                .ok_or_else(|| TemplateError::AssetNotFound {
                    kind,
                    key: key.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn entry() -> RegistryEntry {
        let mut assets = BTreeMap::new();
        assets.insert("logo".to_string(), PathBuf::from("/t/welcome/assets/logo.png"));
        RegistryEntry {
            namespace: "welcome".to_string(),
            path: PathBuf::from("/t/welcome"),
            assets,
        }
    }

    #[test]
    fn test_resolve_assets() {
        let keys = vec!["logo".to_string()];
        let paths = resolve_assets(&entry(), Some(&keys), AssetKind::Inline).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/t/welcome/assets/logo.png")]);

        assert!(resolve_assets(&entry(), None, AssetKind::Inline)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_resolve_assets_fails_fast() {
        let keys = vec!["logo".to_string(), "missing".to_string()];
        let err = resolve_assets(&entry(), Some(&keys), AssetKind::Attachment).unwrap_err();
        assert_eq!(err.to_string(), "Failed to resolve attachment for key missing.");
    }
}
