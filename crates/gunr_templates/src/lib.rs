//! # gunr_templates
//!
//! Filesystem-backed email templates for gunr.
//!
//! A config root holds a `.gunrrc` (or `.gunrrc.json`) naming a templates
//! directory. Every directory below it is a template addressed by a dotted
//! namespace and holds:
//!
//! - `config.json` with defaults, property values and asset keys
//! - `html.hbs`, the Handlebars body
//! - an optional `assets/` directory whose files are addressable by name
//!
//! ## Example
//!
//! ```rust,no_run
//! use gunr_templates::{TemplateLoader, TemplateRenderer};
//! use serde_json::json;
//!
//! # async fn run() -> gunr_templates::TemplateResult<()> {
//! let loader = TemplateLoader::init("/srv/mail")?;
//! let template = loader.load("billing.invoice").await?;
//!
//! let renderer = TemplateRenderer::new();
//! let html = renderer.render(&template.html, &json!({"amount": "12.00"}))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod merge;
pub mod namespace;
pub mod registry;
pub mod renderer;
pub mod resolver;

pub use config::{
    read_config, read_config_async, to_key_value, Properties, Property, PropertyValue,
    RootConfig, TemplateConfig,
};
pub use error::{AssetKind, TemplateError, TemplateResult};
pub use loader::{LoadedTemplate, TemplateLoader};
pub use merge::{merge, merge_maps, merge_values, MergeMode, Overlay};
pub use namespace::{from_namespace, namespace_for, to_namespace};
pub use registry::{RegistryEntry, TemplateRegistry};
pub use renderer::TemplateRenderer;
pub use resolver::{ConfigResolver, ResolvedConfig, ROOT_CONFIG_FILES};
