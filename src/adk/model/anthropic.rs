//! Anthropic Model - Claude API implementation

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::ModelError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

/// Anthropic Claude model implementation
pub struct AnthropicModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl AnthropicModel {
    /// Create a new AnthropicModel
    ///
    /// Requires `ANTHROPIC_API_KEY` environment variable to be set.
    /// Optionally uses `ANTHROPIC_BASE_URL` for custom endpoints.
    pub fn new(model_name: String) -> Result<Self, ModelError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ModelError::ApiKeyMissing("Anthropic".into()))?;
        let base_url = env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
        })
    }

    /// Extract system message from history
    fn extract_system_message(history: &[Content]) -> Option<String> {
        history
            .iter()
            .find(|c| c.role == "system")
            .map(|c| c.text())
    }

    /// Convert internal Content to Anthropic message format
    fn content_to_anthropic_message(content: &Content) -> Option<serde_json::Value> {
        // System messages travel in the top-level `system` field
        if content.role == "system" {
            return None;
        }

        let role = match content.role.as_str() {
            "user" => "user",
            "model" => "assistant",
            other => other,
        };

        let message_content: Vec<serde_json::Value> = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(t) => Some(json!({ "type": "text", "text": t })),
                Part::Thinking(_) => None,
            })
            .collect();

        if message_content.is_empty() {
            return None;
        }

        Some(json!({
            "role": role,
            "content": message_content
        }))
    }

    /// Parse Anthropic response into Content
    fn parse_anthropic_response(response: &serde_json::Value) -> Result<Content, ModelError> {
        let content_blocks = response["content"]
            .as_array()
            .ok_or_else(|| ModelError::InvalidResponse("No content in Anthropic response".into()))?;

        let mut parts = Vec::new();

        for block in content_blocks {
            match block["type"].as_str() {
                Some("text") => {
                    if let Some(text) = block["text"].as_str() {
                        if !text.is_empty() {
                            parts.push(Part::Text(text.to_string()));
                        }
                    }
                }
                Some("thinking") => {
                    if let Some(thinking) = block["thinking"].as_str() {
                        if !thinking.is_empty() {
                            parts.push(Part::Thinking(thinking.to_string()));
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some(stop_reason) = response["stop_reason"].as_str() {
            log::debug!("Anthropic stop reason: {}", stop_reason);
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for AnthropicModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError> {
        let url = format!("{}/messages", self.base_url);

        let system = Self::extract_system_message(history);

        let messages: Vec<serde_json::Value> = history
            .iter()
            .filter_map(Self::content_to_anthropic_message)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages,
            "max_tokens": config.and_then(|c| c.max_output_tokens).unwrap_or(4096)
        });

        if let Some(sys) = system {
            body["system"] = json!(sys);
        }

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
            if let Some(top_k) = cfg.top_k {
                body["top_k"] = json!(top_k);
            }
        }

        log::debug!(
            "Anthropic request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(ModelError::api("Anthropic", status.as_u16(), text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("Anthropic response: {}", resp_json);

        Self::parse_anthropic_response(&resp_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_system_message() {
        let history = vec![
            Content {
                role: "system".to_string(),
                parts: vec![Part::Text("Be terse".to_string())],
            },
            Content::user("Hello"),
        ];

        assert_eq!(
            AnthropicModel::extract_system_message(&history),
            Some("Be terse".to_string())
        );
    }

    #[test]
    fn test_system_message_is_not_sent_as_message() {
        let content = Content {
            role: "system".to_string(),
            parts: vec![Part::Text("You are helpful".to_string())],
        };
        assert!(AnthropicModel::content_to_anthropic_message(&content).is_none());
    }

    #[test]
    fn test_user_message_format() {
        let msg = AnthropicModel::content_to_anthropic_message(&Content::user("Hi")).unwrap();
        assert_eq!(msg["role"], "user");
        assert_eq!(msg["content"][0]["type"], "text");
        assert_eq!(msg["content"][0]["text"], "Hi");
    }

    #[test]
    fn test_parse_anthropic_text_and_thinking() {
        let response = json!({
            "content": [
                {"type": "thinking", "thinking": "considering"},
                {"type": "text", "text": "Answer"}
            ],
            "stop_reason": "end_turn"
        });

        let content = AnthropicModel::parse_anthropic_response(&response).unwrap();
        assert_eq!(content.parts.len(), 2);
        assert_eq!(content.text(), "Answer");
    }

    #[test]
    fn test_parse_anthropic_missing_content() {
        let response = json!({"type": "error"});
        assert!(AnthropicModel::parse_anthropic_response(&response).is_err());
    }
}
