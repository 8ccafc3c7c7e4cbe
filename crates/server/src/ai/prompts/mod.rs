//! Prompt templates for the AI operations.
//!
//! This module provides:
//! - Handlebars-based prompt templates, one per operation
//! - Typed context structs rendered into a system/user message pair
//!
//! Every user prompt embeds the current wall-clock date — the model has
//! no reliable notion of "today" — and ends with an explicit
//! output-schema directive, because response parsing has no fallback.

use handlebars::Handlebars;
use serde::Serialize;

use flowdeck_common::{FlowdeckError, FlowdeckResult};

// Template modules
pub mod briefing;
pub mod extract;
pub mod prioritize;
pub mod suggest;

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID
    pub id: String,
    /// Description
    pub description: String,
    /// System prompt template
    pub system: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> FlowdeckResult<(String, String)> {
        let mut handlebars = create_handlebars();

        handlebars
            .register_template_string("system", &self.system)
            .map_err(|e| FlowdeckError::Internal {
                reason: format!("Invalid system template: {e}"),
            })?;

        handlebars
            .register_template_string("user", &self.user)
            .map_err(|e| FlowdeckError::Internal {
                reason: format!("Invalid user template: {e}"),
            })?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| FlowdeckError::Internal {
                reason: format!("Failed to render system prompt: {e}"),
            })?;

        let user = handlebars
            .render("user", context)
            .map_err(|e| FlowdeckError::Internal {
                reason: format!("Failed to render user prompt: {e}"),
            })?;

        Ok((system, user))
    }
}

/// Create a Handlebars instance with custom helpers.
fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text; HTML escaping would mangle embedded JSON
    handlebars.register_escape_fn(handlebars::no_escape);

    // Helper: {{{json value}}}
    handlebars.register_helper(
        "json",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                if let Some(param) = h.param(0) {
                    let json = serde_json::to_string_pretty(param.value())
                        .unwrap_or_else(|_| "null".to_string());
                    out.write(&json)?;
                }
                Ok(())
            },
        ),
    );

    handlebars
}
