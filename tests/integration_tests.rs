//! Integration tests for dispatch, workflows and the HTTP surface
//!
//! These tests run the real steps, chart renderer, archive and vector
//! memory against a scripted model, a canned search tool and a
//! deterministic embedder, with all files under a temporary directory.

use async_trait::async_trait;
use conductor_rs::adk::error::{ConductorError, MemoryError, ModelError};
use conductor_rs::adk::model::{Content, GenerationConfig, Model};
use conductor_rs::adk::tool::Tool;
use conductor_rs::conductor::archive::ReportArchive;
use conductor_rs::conductor::chart::{read_chart_bars, ChartRenderer};
use conductor_rs::conductor::memory::{Embedder, TextSplitter, VectorMemory};
use conductor_rs::conductor::orchestrator::{AgentRequest, Orchestrator};
use conductor_rs::conductor::server;
use conductor_rs::conductor::workflow::builder::StepContext;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Components
// ============================================================================

/// Mock model that returns predefined responses in order
struct MockModel {
    responses: Vec<String>,
    response_index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|r| r.to_string()).collect(),
            response_index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.response_index.load(Ordering::SeqCst)
    }

    fn prompt(&self, n: usize) -> String {
        self.prompts.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl Model for MockModel {
    async fn generate_content(
        &self,
        history: &[Content],
        _config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError> {
        let idx = self.response_index.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(history[0].text());
        match self.responses.get(idx) {
            Some(text) => Ok(Content::model(text.clone())),
            None => Err(ModelError::InvalidResponse("Max responses reached".into())),
        }
    }
}

/// Static schema for MockSearch
static MOCK_SEARCH_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "query": {"type": "string"}
        }
    })
});

/// Mock search tool with one canned hit
struct MockSearch;

#[async_trait]
impl Tool for MockSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Mock tool: web_search"
    }

    fn schema(&self) -> &Value {
        &MOCK_SEARCH_SCHEMA
    }

    async fn execute(&self, input: Value) -> Result<Value, ConductorError> {
        Ok(json!({
            "query": input["query"],
            "results": [{
                "title": "World population by continent",
                "url": "https://example.org/population",
                "description": "Asia 4.6 billion, Africa 1.3 billion, Europe 0.74 billion"
            }]
        }))
    }
}

/// Letter-frequency embedding, deterministic and offline
struct LetterEmbedder;

#[async_trait]
impl Embedder for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let mut v = vec![0.0; 26];
        for c in text.to_ascii_lowercase().bytes() {
            if c.is_ascii_lowercase() {
                v[(c - b'a') as usize] += 1.0;
            }
        }
        Ok(v)
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    dir: tempfile::TempDir,
    model: Arc<MockModel>,
    memory: Arc<VectorMemory>,
    orchestrator: Arc<Orchestrator>,
}

impl Harness {
    fn new(responses: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(MockModel::new(responses));
        let memory = Arc::new(VectorMemory::in_memory(
            Arc::new(LetterEmbedder),
            TextSplitter::new(1000, 200),
        ));

        let ctx = StepContext {
            model: model.clone(),
            memory: memory.clone(),
            search: Arc::new(MockSearch),
            charts: Arc::new(ChartRenderer::new(dir.path().join("static"))),
            top_k: 5,
        };
        let archive = ReportArchive::new(dir.path().join("history"), memory.clone());

        Self {
            orchestrator: Arc::new(Orchestrator::new(ctx, archive)),
            dir,
            model,
            memory,
        }
    }

    fn static_dir(&self) -> PathBuf {
        self.dir.path().join("static")
    }

    fn history_dir(&self) -> PathBuf {
        self.dir.path().join("history")
    }
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Spin up a test server on a random port and return the base URL.
async fn start_test_server(harness: &Harness) -> String {
    let router = server::router(harness.orchestrator.clone(), &harness.static_dir());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Helper to POST JSON and return (status, body).
async fn post_json(base: &str, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap();
    (status, body)
}

const RESEARCH: &str = "Intro text. Asia:4.6, Africa:1.3, Europe:0.74";
const EXTRACTED: &str = "Sure, here is the data: Asia:4.6, Africa:1.3, Europe:0.74";

// ============================================================================
// Analyst / visualizer workflow
// ============================================================================

#[tokio::test]
async fn test_analyst_visualizer_end_to_end() {
    let h = Harness::new(&[RESEARCH, EXTRACTED]);

    let output = h
        .orchestrator
        .execute(&AgentRequest::new("analyst_visualizer", "compare populations"))
        .await
        .unwrap();

    assert!(output.starts_with("# Analysis Report: compare populations\n\n## Research Summary\n\n"));
    // the narrative survives extraction untouched
    assert!(output.contains(&format!("## Research Summary\n\n{}\n\n", RESEARCH)));
    assert!(output.contains("## Data Visualization\n\n![compare populations](/static/chart_"));
    assert_eq!(h.model.calls(), 2);

    // extraction saw the narrative, not the plan or the series
    assert!(h.model.prompt(1).contains(RESEARCH));

    let charts = files_in(&h.static_dir());
    assert_eq!(charts.len(), 1);
    let bars = read_chart_bars(&charts[0]).await.unwrap();
    let labels: Vec<&str> = bars.iter().map(|(l, _)| l.as_str()).collect();
    let values: Vec<f64> = bars.iter().map(|(_, v)| *v).collect();
    assert_eq!(labels, vec!["Asia", "Africa", "Europe"]);
    assert_eq!(values, vec![4.6, 1.3, 0.74]);

    let mut history: Vec<String> = files_in(&h.history_dir())
        .iter()
        .map(|p| p.extension().unwrap().to_string_lossy().into_owned())
        .collect();
    history.sort();
    assert_eq!(history, vec!["md", "pdf"]);

    assert!(!h.memory.is_empty().await);
}

#[tokio::test]
async fn test_empty_research_aborts_before_extraction() {
    let h = Harness::new(&["   \n  ", "Asia:4.6"]);

    let err = h
        .orchestrator
        .execute(&AgentRequest::new("analyst_visualizer", "compare populations"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConductorError::EmptyResearch));
    assert_eq!(h.model.calls(), 1);
    assert!(files_in(&h.static_dir()).is_empty());
    assert!(files_in(&h.history_dir()).is_empty());
    assert!(h.memory.is_empty().await);
}

#[tokio::test]
async fn test_extraction_without_pattern_fails() {
    let h = Harness::new(&["Asia is big.", "I am unable to find numeric data."]);

    let err = h
        .orchestrator
        .execute(&AgentRequest::new("analyst_visualizer", "compare populations"))
        .await
        .unwrap_err();

    match err {
        ConductorError::ExtractionFailed { raw } => {
            assert_eq!(raw, "I am unable to find numeric data.")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(files_in(&h.static_dir()).is_empty());
    assert!(h.memory.is_empty().await);
}

#[tokio::test]
async fn test_malformed_series_renders_nothing() {
    let h = Harness::new(&[RESEARCH, "Asia:4.6, Africa: about a billion"]);

    let err = h
        .orchestrator
        .execute(&AgentRequest::new("analyst_visualizer", "compare populations"))
        .await
        .unwrap_err();

    match err {
        ConductorError::MalformedSeries { input, .. } => {
            assert_eq!(input, "Asia:4.6, Africa: about a billion")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(files_in(&h.static_dir()).is_empty());
}

// ============================================================================
// Single steps
// ============================================================================

#[tokio::test]
async fn test_single_researcher_uses_memory_and_web() {
    let h = Harness::new(&["1. gather numbers", "Asia has the most people."]);

    h.orchestrator
        .execute(&AgentRequest::new("planner", "asia population"))
        .await
        .unwrap();

    let summary = h
        .orchestrator
        .execute(&AgentRequest::new("researcher", "asia population"))
        .await
        .unwrap();
    assert_eq!(summary, "Asia has the most people.");

    // the planner's archived output is now internal knowledge
    let prompt = h.model.prompt(1);
    assert!(prompt.contains("Memory (Internal Knowledge):\n1. gather numbers"));
    assert!(prompt.contains("World population by continent"));
}

#[tokio::test]
async fn test_single_writer_with_context() {
    let h = Harness::new(&["# Final report"]);

    let out = h
        .orchestrator
        .execute(&AgentRequest::new("writer", "summarise").with_context("key facts"))
        .await
        .unwrap();

    assert_eq!(out, "# Final report");
    assert!(h.model.prompt(0).contains("### Research Summary\nkey facts"));
}

#[tokio::test]
async fn test_gateway_failure_is_not_archived() {
    let h = Harness::new(&[]);

    let err = h
        .orchestrator
        .execute(&AgentRequest::new("coder", "anything"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConductorError::Gateway(_)));
    assert!(files_in(&h.history_dir()).is_empty());
    assert!(h.memory.is_empty().await);
}

#[tokio::test]
async fn test_pipeline_runs_four_steps() {
    let h = Harness::new(&["the plan", "the research", "the code", "the report"]);

    let report = h.orchestrator.run_pipeline("build a thing").await.unwrap();
    assert_eq!(report, "the report");
    assert_eq!(h.model.calls(), 4);
    assert!(h.model.prompt(3).contains("### Plan\nthe plan"));
}

// ============================================================================
// HTTP surface
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let h = Harness::new(&[]);
    let base = start_test_server(&h).await;

    let body: Value = reqwest::get(format!("{}/api/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_unknown_agent_is_client_error() {
    let h = Harness::new(&["should never be used"]);
    let base = start_test_server(&h).await;

    let (status, body) = post_json(
        &base,
        "/execute_agent",
        json!({"agent": "visualizer", "objective": "compare populations"}),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(
        body["detail"],
        json!("Agent 'visualizer' is not valid or cannot be called directly")
    );
    assert_eq!(h.model.calls(), 0);
    assert!(!h.history_dir().exists());
    assert!(!h.static_dir().exists());
    assert!(h.memory.is_empty().await);
}

#[tokio::test]
async fn test_execute_planner_over_http() {
    let h = Harness::new(&["1. step one\n2. step two"]);
    let base = start_test_server(&h).await;

    let (status, body) = post_json(
        &base,
        "/execute_agent",
        json!({"agent": "planner", "objective": "ship it", "context": null}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"output": "1. step one\n2. step two"}));
    assert_eq!(files_in(&h.history_dir()).len(), 2);
}

#[tokio::test]
async fn test_workflow_failure_is_server_error() {
    let h = Harness::new(&[""]);
    let base = start_test_server(&h).await;

    let (status, body) = post_json(
        &base,
        "/execute_agent",
        json!({"agent": "analyst_visualizer", "objective": "compare populations"}),
    )
    .await;

    assert_eq!(status, 500);
    assert!(body["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_chart_link_is_served() {
    let h = Harness::new(&[RESEARCH, EXTRACTED]);
    let base = start_test_server(&h).await;

    let (status, body) = post_json(
        &base,
        "/execute_agent",
        json!({"agent": "analyst_visualizer", "objective": "compare populations"}),
    )
    .await;
    assert_eq!(status, 200);

    let output = body["output"].as_str().unwrap();
    let start = output.find("(/static/").unwrap() + 1;
    let end = output[start..].find(')').unwrap() + start;
    let link = &output[start..end];

    let resp = reqwest::get(format!("{}{}", base, link)).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.text().await.unwrap().contains("data-label=\"Asia\""));
}
