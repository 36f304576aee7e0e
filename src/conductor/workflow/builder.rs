// SPDX-License-Identifier: MIT

//! Workflow builder
//!
//! Constructs every step once from a shared [`StepContext`] and assembles
//! them into executable graphs: the linear plan/research/code/write
//! pipeline, the analyst/visualizer workflow, and one-node workflows for
//! directly callable agents.

use crate::adk::error::{ConductorError, Result};
use crate::adk::model::Model;
use crate::adk::tool::Tool;
use crate::conductor::chart::ChartRenderer;
use crate::conductor::memory::MemoryStore;
use crate::conductor::workflow::graph::{Abort, CompiledNode, GraphWorkflow, Guard};
use crate::conductor::workflow::registry::{AgentKind, StepRegistry};
use crate::conductor::workflow::state::StateField;
use crate::conductor::workflow::steps::{
    self, AnalysisReportStep, ExtractStep, ResearchStep, VisualizeStep, ANALYSIS_REPORT, CODER,
    EXTRACTOR, PLANNER, RESEARCHER, VISUALIZER, WRITER,
};
use std::sync::Arc;

/// Collaborators injected into the steps
#[derive(Clone)]
pub struct StepContext {
    pub model: Arc<dyn Model>,
    pub memory: Arc<dyn MemoryStore>,
    pub search: Arc<dyn Tool>,
    pub charts: Arc<ChartRenderer>,
    pub top_k: usize,
}

/// Builds workflows from registered steps
pub struct Builder {
    registry: StepRegistry,
}

impl Builder {
    pub fn new(ctx: &StepContext) -> Self {
        let mut registry = StepRegistry::new();
        registry.register(Arc::new(steps::planner(ctx.model.clone())));
        registry.register(Arc::new(ResearchStep::new(
            ctx.model.clone(),
            ctx.memory.clone(),
            ctx.search.clone(),
            ctx.top_k,
        )));
        registry.register(Arc::new(steps::coder(ctx.model.clone())));
        registry.register(Arc::new(steps::writer(ctx.model.clone())));
        registry.register(Arc::new(ExtractStep::new(ctx.model.clone())));
        registry.register(Arc::new(VisualizeStep::new(ctx.charts.clone())));
        registry.register(Arc::new(AnalysisReportStep));

        log::info!("Registered {} steps", registry.len());
        Self { registry }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// plan -> research -> code -> write, no guards
    pub fn pipeline(&self) -> Result<GraphWorkflow> {
        let nodes = vec![
            self.node(PLANNER)?,
            self.node(RESEARCHER)?,
            self.node(CODER)?,
            self.node(WRITER)?,
        ];
        Ok(GraphWorkflow::new("pipeline", nodes))
    }

    /// research -> extract -> visualize -> report, aborting on empty
    /// research or an empty series
    pub fn analyst_visualizer(&self) -> Result<GraphWorkflow> {
        let nodes = vec![
            self.node(RESEARCHER)?.guarded(Guard::RequireNonEmpty(
                StateField::NarrativeSummary,
                Abort::EmptyResearch,
            )),
            self.node(EXTRACTOR)?.guarded(Guard::RequireNonEmpty(
                StateField::StructuredSeries,
                Abort::ExtractionFailed,
            )),
            self.node(VISUALIZER)?,
            self.node(ANALYSIS_REPORT)?,
        ];
        Ok(GraphWorkflow::new(
            AgentKind::AnalystVisualizer.as_str(),
            nodes,
        ))
    }

    /// Workflow serving a dispatch to `kind`
    pub fn for_agent(&self, kind: AgentKind) -> Result<GraphWorkflow> {
        let step = match kind {
            AgentKind::AnalystVisualizer => return self.analyst_visualizer(),
            AgentKind::Planner => PLANNER,
            AgentKind::Researcher => RESEARCHER,
            AgentKind::Coder => CODER,
            AgentKind::Writer => WRITER,
        };
        Ok(GraphWorkflow::new(kind.as_str(), vec![self.node(step)?]))
    }

    fn node(&self, name: &str) -> Result<CompiledNode> {
        let step = self
            .registry
            .get(name)
            .ok_or_else(|| ConductorError::config(format!("step '{}' is not registered", name)))?;
        Ok(CompiledNode::new(name, step))
    }
}
