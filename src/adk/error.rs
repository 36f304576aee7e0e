// SPDX-License-Identifier: MIT

//! Typed error handling for conductor-rs
//!
//! Errors are classified by the condition they signal rather than by where
//! they were raised. The HTTP boundary only needs to know whether an error
//! is the caller's fault (`is_client_error`) or an internal failure.

use thiserror::Error;

/// Top-level error type for conductor-rs
#[derive(Debug, Error)]
pub enum ConductorError {
    /// Unknown agent or workflow name. Raised before any work is performed.
    #[error("Agent '{0}' is not valid or cannot be called directly")]
    InvalidRequest(String),

    /// The research step produced nothing usable
    #[error("Research returned no relevant information")]
    EmptyResearch,

    /// The extraction step was handed an empty text
    #[error("No text was provided for data extraction")]
    NoInputData,

    /// The extractor output contained no recognizable `label:value` run
    #[error("Data extraction failed: no formatted data found. Raw output received: '{raw}'")]
    ExtractionFailed { raw: String },

    /// Structured text failed strict parsing in the chart renderer
    #[error("Unable to parse chart data. Data received: {input}. Error: {reason}")]
    MalformedSeries { input: String, reason: String },

    /// A step finished without producing its designated field
    #[error("The agent '{0}' produced no result")]
    MissingOutput(String),

    /// LLM gateway failures
    #[error("Gateway failure: {0}")]
    Gateway(#[from] ModelError),

    /// Memory store failures
    #[error("Memory store failure: {0}")]
    Store(#[from] MemoryError),

    /// Web search failures
    #[error("Web search failure: {message}")]
    Search { message: String },

    /// Prompt rendering failures
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for provider: {0}")]
    ApiKeyMissing(String),

    /// Provider name not recognized
    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),

    /// Non-success status from the provider
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Memory store errors
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The embedding backend failed or returned an unusable vector
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// The backing file could not be decoded or encoded
    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConductorError {
    /// Create a search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a malformed series error
    pub fn malformed_series(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSeries {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error should be reported as a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

impl ModelError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = ConductorError> = std::result::Result<T, E>;
