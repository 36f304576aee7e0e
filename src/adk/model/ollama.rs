// SPDX-License-Identifier: MIT

//! Ollama Model - local chat API implementation

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::ModelError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Model served by a local Ollama daemon
pub struct OllamaModel {
    client: Client,
    model_name: String,
    base_url: String,
}

impl OllamaModel {
    /// Create a new OllamaModel talking to `base_url` (e.g. `http://localhost:11434`)
    pub fn new(model_name: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            model_name,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn content_to_ollama_message(content: &Content) -> serde_json::Value {
        let role = match content.role.as_str() {
            "model" => "assistant",
            other => other,
        };
        json!({
            "role": role,
            "content": content.text()
        })
    }

    fn parse_ollama_response(response: &serde_json::Value) -> Result<Content, ModelError> {
        let message = response
            .get("message")
            .ok_or_else(|| ModelError::InvalidResponse("No message in Ollama response".into()))?;

        let mut parts = Vec::new();
        if let Some(thinking) = message["thinking"].as_str() {
            if !thinking.is_empty() {
                parts.push(Part::Thinking(thinking.to_string()));
            }
        }
        if let Some(text) = message["content"].as_str() {
            parts.push(Part::Text(text.to_string()));
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for OllamaModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError> {
        let url = format!("{}/api/chat", self.base_url);

        let messages: Vec<serde_json::Value> = history
            .iter()
            .map(Self::content_to_ollama_message)
            .collect();

        let mut options = serde_json::Map::new();
        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                options.insert("temperature".into(), json!(temp));
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                options.insert("num_predict".into(), json!(max_tokens));
            }
            if let Some(top_p) = cfg.top_p {
                options.insert("top_p".into(), json!(top_p));
            }
            if let Some(top_k) = cfg.top_k {
                options.insert("top_k".into(), json!(top_k));
            }
        }

        let body = json!({
            "model": self.model_name,
            "messages": messages,
            "stream": false,
            "options": options
        });

        log::debug!("Ollama request to {} with {} messages", url, history.len());

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(ModelError::api("Ollama", status.as_u16(), text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("Ollama response: {}", resp_json);

        Self::parse_ollama_response(&resp_json)
    }
}
