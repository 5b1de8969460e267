//! Handlebars rendering.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{TemplateError, TemplateResult};

/// Template renderer.
///
/// Output is a pure function of the template text and the data. Missing
/// variables render as empty strings and interpolated values are HTML
/// escaped.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            handlebars: Handlebars::new(),
        }
    }

    /// Compile `template` and apply `data` to it.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> TemplateResult<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| TemplateError::RenderingFailed(e.to_string()))
    }

    /// Render property values that are themselves templates.
    ///
    /// The map is serialized to JSON, rendered as one template against
    /// `data`, then parsed back. Template authors must keep the rendered
    /// text valid JSON: a value that injects an unescaped quote or brace
    /// fails here with [`TemplateError::PropertyRender`].
    pub fn render_properties<T: Serialize>(
        &self,
        properties: &Map<String, Value>,
        data: &T,
    ) -> TemplateResult<Map<String, Value>> {
        let serialized = serde_json::to_string(properties)?;
        let rendered = self.render(&serialized, data)?;
        serde_json::from_str(&rendered).map_err(|e| TemplateError::PropertyRender(e.to_string()))
    }
}
