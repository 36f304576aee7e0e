// SPDX-License-Identifier: MIT

//! Application configuration
//!
//! Layered as built-in defaults, then an optional YAML file, then
//! environment variables (after `.env` is loaded by `main`).

use crate::adk::error::{ConductorError, Result};
use crate::adk::model::ModelSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var naming the YAML file when `--config` is absent
pub const CONFIG_ENV: &str = "CONDUCTOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: String,
    pub name: String,
    pub ollama_base_url: String,
    pub embedding_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            name: "llama3".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "llama3".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub path: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./memory_data/memory.json"),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub provider: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "duckduckgo".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub memory: MemoryConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
    pub history_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            memory: MemoryConfig::default(),
            search: SearchConfig::default(),
            server: ServerConfig::default(),
            history_dir: PathBuf::from("history"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    /// Load defaults, the YAML file at `path` (or `$CONDUCTOR_CONFIG`), then
    /// the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(p) => {
                log::info!("Loading configuration from {}", p.display());
                Self::from_yaml(&std::fs::read_to_string(&p)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML document; absent keys keep their defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override fields from environment variables looked up by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("MODEL_PROVIDER") {
            self.model.provider = v.to_lowercase();
        }
        if let Some(v) = get("MODEL_NAME") {
            self.model.name = v;
        }
        if let Some(v) = get("OLLAMA_BASE_URL") {
            self.model.ollama_base_url = v;
        }
        if let Some(v) = get("EMBEDDING_MODEL") {
            self.model.embedding_model = v;
        }
        if let Some(v) = get("MEMORY_PATH") {
            self.memory.path = PathBuf::from(v);
        }
        if let Some(v) = get("MEMORY_TOP_K") {
            self.memory.top_k = parse_number("MEMORY_TOP_K", &v)?;
        }
        match get("SEARCH_PROVIDER") {
            Some(v) => self.search.provider = v.to_lowercase(),
            None if get("BRAVE_API_KEY").is_some() => self.search.provider = "brave".to_string(),
            None => {}
        }
        if let Some(v) = get("HISTORY_DIR") {
            self.history_dir = PathBuf::from(v);
        }
        if let Some(v) = get("STATIC_DIR") {
            self.static_dir = PathBuf::from(v);
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_number("PORT", &v)?;
        }
        Ok(())
    }

    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            provider: self.model.provider.clone(),
            name: self.model.name.clone(),
            ollama_base_url: self.model.ollama_base_url.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConductorError::config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model.provider, "ollama");
        assert_eq!(config.model.name, "llama3");
        assert_eq!(config.memory.chunk_size, 1000);
        assert_eq!(config.memory.chunk_overlap, 200);
        assert_eq!(config.memory.top_k, 5);
        assert_eq!(config.search.provider, "duckduckgo");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.history_dir, PathBuf::from("history"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
model:
  provider: openai
  name: gpt-4o-mini
server:
  port: 9000
static_dir: /srv/static
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.name, "gpt-4o-mini");
        assert_eq!(config.model.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.memory.top_k, 5);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml("server: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConductorError::Yaml(_)));
    }

    #[test]
    fn test_env_overrides_yaml() {
        let mut config = AppConfig::from_yaml("model:\n  name: mistral\n").unwrap();
        config
            .apply_env(env(&[
                ("MODEL_NAME", "llama3.1"),
                ("MODEL_PROVIDER", "Anthropic"),
                ("MEMORY_PATH", "/tmp/mem.json"),
                ("PORT", "8080"),
                ("HISTORY_DIR", ""),
            ]))
            .unwrap();

        assert_eq!(config.model.name, "llama3.1");
        assert_eq!(config.model.provider, "anthropic");
        assert_eq!(config.memory.path, PathBuf::from("/tmp/mem.json"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.history_dir, PathBuf::from("history"));
    }

    #[test]
    fn test_brave_key_selects_brave() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("BRAVE_API_KEY", "k")])).unwrap();
        assert_eq!(config.search.provider, "brave");

        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("BRAVE_API_KEY", "k"), ("SEARCH_PROVIDER", "duckduckgo")]))
            .unwrap();
        assert_eq!(config.search.provider, "duckduckgo");
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConductorError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conductor.yaml");
        std::fs::write(&path, "memory:\n  top_k: 3\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.memory.top_k, 3);
    }

    #[test]
    fn test_model_settings() {
        let settings = AppConfig::default().model_settings();
        assert_eq!(settings.provider, "ollama");
        assert_eq!(settings.name, "llama3");
    }
}
