// SPDX-License-Identifier: MIT

use crate::adk::error::ConductorError;
use crate::adk::tool::Tool;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;

// --- Static schema ---

static WEB_SEARCH_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The search query"
            },
            "count": {
                "type": "integer",
                "description": "Number of results to return (default 10, max 20)"
            }
        },
        "required": ["query"]
    })
});

#[derive(Debug, Serialize, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub results: Vec<SearchResult>,
    pub query: String,
}

/// Render a search tool's output as a snippet blob for prompt context
pub fn search_snippets(output: &Value) -> String {
    let Ok(parsed) = serde_json::from_value::<WebSearchResult>(output.clone()) else {
        return output.to_string();
    };
    if parsed.results.is_empty() {
        return format!("No web results for '{}'.", parsed.query);
    }
    parsed
        .results
        .iter()
        .map(|r| {
            if r.url.is_empty() {
                format!("{}: {}", r.title, r.description)
            } else {
                format!("{}: {} ({})", r.title, r.description, r.url)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run a search tool for `query` and return the snippet blob
pub async fn search_text(tool: &dyn Tool, query: &str) -> Result<String, ConductorError> {
    let output = tool.execute(json!({ "query": query })).await?;
    Ok(search_snippets(&output))
}

/// Construct the configured search backend
pub fn default_search_tool(provider: &str) -> Result<Arc<dyn Tool>, ConductorError> {
    match provider.to_lowercase().as_str() {
        "brave" => Ok(Arc::new(BraveSearchTool::new()?)),
        "duckduckgo" | "ddg" => Ok(Arc::new(DuckDuckGoSearchTool::new())),
        other => Err(ConductorError::config(format!(
            "unknown search provider '{}'",
            other
        ))),
    }
}

// --- Brave ---

pub struct BraveSearchTool {
    client: Client,
    api_key: String,
    base_url: String,
}

impl BraveSearchTool {
    pub fn new() -> Result<Self, ConductorError> {
        let api_key = env::var("BRAVE_API_KEY")
            .map_err(|_| ConductorError::config("BRAVE_API_KEY must be set"))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.search.brave.com".to_string(),
        })
    }
}

#[async_trait]
impl Tool for BraveSearchTool {
    fn name(&self) -> &str {
        "brave_search"
    }

    fn description(&self) -> &str {
        "Searches the web using Brave Search API. Returns relevant search results with titles, URLs, and descriptions."
    }

    fn schema(&self) -> &Value {
        &WEB_SEARCH_SCHEMA
    }

    async fn execute(&self, input: Value) -> Result<Value, ConductorError> {
        let args: WebSearchArgs = serde_json::from_value(input)?;

        let count = args.count.unwrap_or(10).min(20);

        let mut url = url::Url::parse(&format!("{}/res/v1/web/search", self.base_url))
            .map_err(|e| ConductorError::search(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", &args.query)
            .append_pair("count", &count.to_string());

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| ConductorError::search(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ConductorError::search(format!("Brave API error: {}", text)));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ConductorError::search(e.to_string()))?;

        let results_json = body
            .get("web")
            .and_then(|w| w.get("results"))
            .ok_or_else(|| ConductorError::search("Invalid response format: missing web.results"))?;

        let results: Vec<SearchResult> = serde_json::from_value(results_json.clone())?;

        let result = WebSearchResult {
            results,
            query: args.query,
        };

        Ok(serde_json::to_value(result)?)
    }
}

// --- DuckDuckGo ---

/// DuckDuckGo Instant Answer API. Needs no key.
pub struct DuckDuckGoSearchTool {
    client: Client,
    base_url: String,
}

impl DuckDuckGoSearchTool {
    pub fn new() -> Self {
        Self::with_base_url("https://api.duckduckgo.com")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn parse_instant_answer(body: &Value, limit: usize) -> Vec<SearchResult> {
        let mut results = Vec::new();

        if let Some(text) = body["AbstractText"].as_str().filter(|t| !t.is_empty()) {
            results.push(SearchResult {
                title: body["Heading"].as_str().unwrap_or_default().to_string(),
                url: body["AbstractURL"].as_str().unwrap_or_default().to_string(),
                description: text.to_string(),
            });
        }

        let mut topics: Vec<&Value> = Vec::new();
        if let Some(related) = body["RelatedTopics"].as_array() {
            for topic in related {
                // Grouped topics nest their entries one level down
                match topic["Topics"].as_array() {
                    Some(nested) => topics.extend(nested.iter()),
                    None => topics.push(topic),
                }
            }
        }

        for topic in topics {
            if results.len() >= limit {
                break;
            }
            let Some(text) = topic["Text"].as_str().filter(|t| !t.is_empty()) else {
                continue;
            };
            let title = text.split(" - ").next().unwrap_or(text).to_string();
            results.push(SearchResult {
                title,
                url: topic["FirstURL"].as_str().unwrap_or_default().to_string(),
                description: text.to_string(),
            });
        }

        results.truncate(limit);
        results
    }
}

impl Default for DuckDuckGoSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DuckDuckGoSearchTool {
    fn name(&self) -> &str {
        "duckduckgo_search"
    }

    fn description(&self) -> &str {
        "Searches the web using the DuckDuckGo Instant Answer API. Returns summary snippets with titles and URLs."
    }

    fn schema(&self) -> &Value {
        &WEB_SEARCH_SCHEMA
    }

    async fn execute(&self, input: Value) -> Result<Value, ConductorError> {
        let args: WebSearchArgs = serde_json::from_value(input)?;
        let count = args.count.unwrap_or(10).min(20) as usize;

        let mut url = url::Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| ConductorError::search(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", &args.query)
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1");

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ConductorError::search(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ConductorError::search(format!(
                "DuckDuckGo returned {}",
                status
            )));
        }

        // DuckDuckGo serves JSON with a javascript content type
        let raw = resp
            .text()
            .await
            .map_err(|e| ConductorError::search(e.to_string()))?;
        let body: Value = serde_json::from_str(&raw)?;

        let result = WebSearchResult {
            results: Self::parse_instant_answer(&body, count),
            query: args.query,
        };

        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_instant_answer() {
        let body = json!({
            "Heading": "Asia",
            "AbstractText": "Asia is the largest continent.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Asia",
            "RelatedTopics": [
                {"Text": "Africa - Second largest continent", "FirstURL": "https://duckduckgo.com/Africa"},
                {"Name": "Regions", "Topics": [
                    {"Text": "Europe - A continent", "FirstURL": "https://duckduckgo.com/Europe"}
                ]},
                {"Text": "", "FirstURL": "https://duckduckgo.com/empty"}
            ]
        });

        let results = DuckDuckGoSearchTool::parse_instant_answer(&body, 10);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Asia");
        assert_eq!(results[1].title, "Africa");
        assert_eq!(results[2].url, "https://duckduckgo.com/Europe");
    }

    #[test]
    fn test_parse_instant_answer_respects_limit() {
        let body = json!({
            "RelatedTopics": [
                {"Text": "a", "FirstURL": "u1"},
                {"Text": "b", "FirstURL": "u2"},
                {"Text": "c", "FirstURL": "u3"}
            ]
        });
        assert_eq!(DuckDuckGoSearchTool::parse_instant_answer(&body, 2).len(), 2);
    }

    #[test]
    fn test_search_snippets() {
        let output = json!({
            "query": "asia",
            "results": [
                {"title": "Asia", "url": "https://x", "description": "Big."},
                {"title": "Note", "url": "", "description": "No link."}
            ]
        });
        assert_eq!(
            search_snippets(&output),
            "Asia: Big. (https://x)\nNote: No link."
        );
    }

    #[test]
    fn test_search_snippets_no_results() {
        let output = json!({"query": "zzz", "results": []});
        assert_eq!(search_snippets(&output), "No web results for 'zzz'.");
    }

    #[test]
    fn test_unknown_provider() {
        assert!(default_search_tool("altavista").is_err());
        assert!(default_search_tool("DuckDuckGo").is_ok());
    }

    #[tokio::test]
    async fn test_duckduckgo_execute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "world population"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"Heading":"World population","AbstractText":"About 8 billion.","AbstractURL":"https://w","RelatedTopics":[]}"#,
            ))
            .mount(&server)
            .await;

        let tool = DuckDuckGoSearchTool::with_base_url(server.uri());
        let text = search_text(&tool, "world population").await.unwrap();
        assert_eq!(text, "World population: About 8 billion. (https://w)");
    }

    #[tokio::test]
    async fn test_duckduckgo_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let tool = DuckDuckGoSearchTool::with_base_url(server.uri());
        let err = tool.execute(json!({"query": "x"})).await.unwrap_err();
        assert!(matches!(err, ConductorError::Search { .. }));
    }
}
