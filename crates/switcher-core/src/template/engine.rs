//! Tera-based rendering of single annotation values.

use serde::Serialize;
use tera::{Context, Tera};

use super::filters;
use crate::error::{SwitchError, SwitchResult};

/// Template name used when the render context itself cannot be built.
const CONTEXT_TEMPLATE: &str = "request";

const DIRECTIVE_OPENERS: [&str; 3] = ["{{", "{%", "{#"];

/// Read-only data that annotation templates are rendered against.
///
/// Built once per invocation from the serialized request; top-level keys
/// become template variables (`{{ observed.composite.resource.spec.size }}`).
#[derive(Debug, Clone)]
pub struct RenderContext {
    context: Context,
}

impl RenderContext {
    /// Build a context from a JSON object.
    pub fn from_value(value: serde_json::Value) -> SwitchResult<Self> {
        if !value.is_object() {
            return Err(SwitchError::render(
                CONTEXT_TEMPLATE,
                "render context must be a JSON object",
            ));
        }
        let context = Context::from_value(value)
            .map_err(|e| SwitchError::render(CONTEXT_TEMPLATE, describe(&e)))?;
        Ok(Self { context })
    }

    /// Build a context by serializing any value that serializes to an object.
    pub fn from_serialize<T: Serialize>(value: &T) -> SwitchResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| SwitchError::render(CONTEXT_TEMPLATE, e.to_string()))?;
        Self::from_value(value)
    }

    /// An empty context; only plain values and literals render against it.
    pub fn empty() -> Self {
        Self {
            context: Context::new(),
        }
    }
}

/// Renders annotation values.
///
/// Holds no state between calls: every render builds its own Tera instance,
/// so one renderer can be shared freely across concurrent invocations.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `template_text` against `context`.
    ///
    /// `template_name` only labels errors. Text without template directives is
    /// returned as is. Undefined variables are errors.
    pub fn render(
        &self,
        template_text: &str,
        template_name: &str,
        context: &RenderContext,
    ) -> SwitchResult<String> {
        if !has_directives(template_text) {
            return Ok(template_text.to_string());
        }

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        filters::register(&mut tera);

        tera.add_raw_template(template_name, template_text)
            .map_err(|e| SwitchError::render(template_name, describe(&e)))?;
        let rendered = tera
            .render(template_name, &context.context)
            .map_err(|e| SwitchError::render(template_name, describe(&e)))?;

        tracing::trace!(template = template_name, rendered = %rendered, "Rendered template");
        Ok(rendered)
    }
}

fn has_directives(text: &str) -> bool {
    DIRECTIVE_OPENERS.iter().any(|opener| text.contains(opener))
}

/// Tera keeps the useful part of a failure in the source chain.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}
