// SPDX-License-Identifier: MIT

//! LLM agent - one template, one completion
//!
//! The agent renders its template from the supplied variables and sends the
//! prompt at zero temperature. There are no retries; a gateway failure is
//! returned to the caller.

use super::PromptTemplate;
use crate::adk::error::Result;
use crate::adk::model::{complete, GenerationConfig, Model};
use std::collections::HashMap;
use std::sync::Arc;

/// Template-to-LLM agent
pub struct LlmAgent {
    pub name: String,
    pub template: PromptTemplate,
    pub model: Arc<dyn Model>,
    config: GenerationConfig,
}

impl LlmAgent {
    pub fn new(name: impl Into<String>, template: PromptTemplate, model: Arc<dyn Model>) -> Self {
        Self {
            name: name.into(),
            template,
            model,
            config: GenerationConfig::deterministic(),
        }
    }

    /// Render the prompt from `vars`
    pub fn render(&self, vars: &HashMap<&str, String>) -> Result<String> {
        self.template.render(vars)
    }

    /// Send a rendered prompt and return the raw completion
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let text = complete(self.model.as_ref(), prompt, &self.config).await?;

        log::info!(
            "Agent {} returning text response (length: {}, preview: '{}')",
            self.name,
            text.len(),
            preview(&text, 100)
        );
        Ok(text)
    }

    /// Render and send in one go
    pub async fn run(&self, vars: &HashMap<&str, String>) -> Result<String> {
        let prompt = self.render(vars)?;
        self.generate(&prompt).await
    }
}

/// First `max` characters of `text`, on a char boundary
pub fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
