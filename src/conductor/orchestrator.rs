// SPDX-License-Identifier: MIT

//! Dispatch: one request in, one output string out.
//!
//! The agent name is validated before anything runs, so an unknown name
//! never touches the model, the chart directory, the archive or memory.

use crate::adk::error::{ConductorError, Result};
use crate::adk::model::build_model;
use crate::conductor::archive::ReportArchive;
use crate::conductor::chart::ChartRenderer;
use crate::conductor::config::AppConfig;
use crate::conductor::memory::{MemoryStore, OllamaEmbedder, TextSplitter, VectorMemory};
use crate::conductor::tools::search::default_search_tool;
use crate::conductor::workflow::builder::{Builder, StepContext};
use crate::conductor::workflow::registry::AgentKind;
use crate::conductor::workflow::state::{StateField, WorkflowState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PIPELINE: &str = "pipeline";

/// Body of `POST /execute_agent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub agent: String,
    pub objective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AgentRequest {
    pub fn new(agent: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            objective: objective.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

pub struct Orchestrator {
    builder: Builder,
    archive: ReportArchive,
    memory: Arc<dyn MemoryStore>,
}

impl Orchestrator {
    pub fn new(ctx: StepContext, archive: ReportArchive) -> Self {
        Self {
            builder: Builder::new(&ctx),
            archive,
            memory: ctx.memory,
        }
    }

    /// Wire every collaborator from configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let model = build_model(&config.model_settings())?;

        let embedder = Arc::new(OllamaEmbedder::new(
            config.model.embedding_model.clone(),
            config.model.ollama_base_url.clone(),
        ));
        let splitter = TextSplitter::new(config.memory.chunk_size, config.memory.chunk_overlap);
        let memory: Arc<dyn MemoryStore> =
            Arc::new(VectorMemory::open(&config.memory.path, embedder, splitter).await?);

        let search = default_search_tool(&config.search.provider)?;
        log::info!("Registered tool: {}", search.name());

        let ctx = StepContext {
            model,
            memory: memory.clone(),
            search,
            charts: Arc::new(ChartRenderer::new(&config.static_dir)),
            top_k: config.memory.top_k,
        };
        let archive = ReportArchive::new(&config.history_dir, memory);
        Ok(Self::new(ctx, archive))
    }

    /// Run the named agent or composite workflow and archive its output
    pub async fn execute(&self, request: &AgentRequest) -> Result<String> {
        let kind: AgentKind = request.agent.parse()?;
        log::info!("Starting agent {} for '{}'", kind, request.objective);

        let state = if kind.is_composite() {
            WorkflowState::new(request.objective.clone())
        } else {
            WorkflowState::with_context(request.objective.clone(), request.context.clone())
        };

        let run = self.builder.for_agent(kind)?.run(state).await?;
        log::info!("Agent {} finished after {:?}", kind, run.visited);

        let output = run
            .state
            .get(kind.output_field())
            .map(str::to_string)
            .ok_or_else(|| ConductorError::MissingOutput(kind.to_string()))?;

        self.archive
            .save(&output, &request.objective, kind.as_str())
            .await?;
        Ok(output)
    }

    /// Full plan -> research -> code -> write pipeline; returns the report
    pub async fn run_pipeline(&self, objective: &str) -> Result<String> {
        let run = self
            .builder
            .pipeline()?
            .run(WorkflowState::new(objective))
            .await?;

        let report = run
            .state
            .get(StateField::Report)
            .map(str::to_string)
            .ok_or_else(|| ConductorError::MissingOutput(PIPELINE.to_string()))?;
        self.archive.save(&report, objective, PIPELINE).await?;
        Ok(report)
    }

    /// Make memory durable before the process exits
    pub async fn shutdown(&self) -> Result<()> {
        log::info!("Flushing memory store");
        self.memory.flush().await?;
        Ok(())
    }
}
