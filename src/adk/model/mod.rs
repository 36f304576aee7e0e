// SPDX-License-Identifier: MIT

//! Model module - defines the LLM gateway trait and implementations
//!
//! This module provides the core Model trait and shared types.
//! Model implementations are in their own submodules:
//! - [ollama] - local Ollama server (default)
//! - [openai] - OpenAI-compatible chat completions API
//! - [anthropic] - Anthropic's Claude API

pub mod anthropic;
pub mod ollama;
pub mod openai;

use crate::adk::error::{ConductorError, ModelError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}

impl GenerationConfig {
    /// Deterministic sampling, used by every agent step
    pub fn deterministic() -> Self {
        Self {
            temperature: Some(0.0),
            ..Default::default()
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, thinking excluded
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect()
    }
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Thinking/reasoning content from thinking models
    Thinking(String),
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError>;
}

/// Text in, text out: send a single user prompt and return the completion text
pub async fn complete(
    model: &dyn Model,
    prompt: &str,
    config: &GenerationConfig,
) -> Result<String, ModelError> {
    let response = model
        .generate_content(&[Content::user(prompt)], Some(config))
        .await?;
    Ok(response.text())
}

/// Provider selection for [`build_model`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    pub provider: String,
    pub name: String,
    pub ollama_base_url: String,
}

/// Construct the configured model provider
pub fn build_model(settings: &ModelSettings) -> Result<Arc<dyn Model>, ConductorError> {
    log::info!(
        "Using provider: {} with model: {}",
        settings.provider,
        settings.name
    );

    let model: Arc<dyn Model> = match settings.provider.to_lowercase().as_str() {
        "ollama" => Arc::new(ollama::OllamaModel::new(
            settings.name.clone(),
            settings.ollama_base_url.clone(),
        )),
        "openai" => Arc::new(openai::OpenAIModel::new(settings.name.clone())?),
        "anthropic" => Arc::new(anthropic::AnthropicModel::new(settings.name.clone())?),
        other => {
            return Err(ConductorError::config(format!(
                "unknown model provider '{}'",
                other
            )))
        }
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl Model for EchoModel {
        async fn generate_content(
            &self,
            history: &[Content],
            config: Option<&GenerationConfig>,
        ) -> Result<Content, ModelError> {
            let temp = config.and_then(|c| c.temperature).unwrap_or(1.0);
            Ok(Content {
                role: "model".to_string(),
                parts: vec![
                    Part::Thinking("hmm".to_string()),
                    Part::Text(format!("{}@{}", history[0].text(), temp)),
                ],
            })
        }
    }

    #[tokio::test]
    async fn test_complete_skips_thinking() {
        let out = complete(&EchoModel, "hi", &GenerationConfig::deterministic())
            .await
            .unwrap();
        assert_eq!(out, "hi@0");
    }

    #[test]
    fn test_build_model_rejects_unknown_provider() {
        let settings = ModelSettings {
            provider: "carrier-pigeon".to_string(),
            name: "llama3".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
        };
        let err = build_model(&settings).err().unwrap();
        assert!(matches!(err, ConductorError::Config(_)));
    }

    #[test]
    fn test_build_model_ollama_needs_no_key() {
        let settings = ModelSettings {
            provider: "Ollama".to_string(),
            name: "llama3".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
        };
        assert!(build_model(&settings).is_ok());
    }
}
