// SPDX-License-Identifier: MIT

use super::prompts::{self, research_context};
use crate::adk::agent::PromptTemplate;
use crate::conductor::workflow::agent::{AgentStep, PromptStep};
use crate::adk::error::Result;
use crate::adk::model::Model;
use crate::adk::tool::Tool;
use crate::conductor::memory::MemoryStore;
use crate::conductor::tools::search::search_text;
use crate::conductor::workflow::state::{StateField, StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

const NO_MEMORY: &str = "No stored knowledge.";

/// Research: queries memory and the web for the objective, then asks the
/// model to summarise both into `narrative_summary`.
pub struct ResearchStep {
    prompt: PromptStep,
    memory: Arc<dyn MemoryStore>,
    search: Arc<dyn Tool>,
    top_k: usize,
}

impl ResearchStep {
    pub fn new(
        model: Arc<dyn Model>,
        memory: Arc<dyn MemoryStore>,
        search: Arc<dyn Tool>,
        top_k: usize,
    ) -> Self {
        Self {
            prompt: PromptStep::new(
                super::RESEARCHER,
                PromptTemplate::new(prompts::RESEARCHER),
                model,
                vec![StateField::Objective, StateField::Plan],
                StateField::NarrativeSummary,
            ),
            memory,
            search,
            top_k,
        }
    }

    /// Memory matches and web snippets for `objective` as one context block
    pub async fn gather_context(&self, objective: &str) -> Result<String> {
        let docs = self.memory.query(objective, self.top_k).await?;
        log::debug!("Memory returned {} documents", docs.len());

        let memory = if docs.is_empty() {
            NO_MEMORY.to_string()
        } else {
            docs.join("\n\n")
        };

        let web = search_text(self.search.as_ref(), objective).await?;
        Ok(research_context(&memory, &web))
    }
}

#[async_trait]
impl AgentStep for ResearchStep {
    fn name(&self) -> &str {
        self.prompt.name()
    }

    fn reads(&self) -> &[StateField] {
        self.prompt.reads()
    }

    fn produces(&self) -> StateField {
        StateField::NarrativeSummary
    }

    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate> {
        log::info!("Researching objective '{}'", state.objective);

        let context = self.gather_context(&state.objective).await?;
        let prompt = self.prompt.render_with(state, &[("context", context)])?;
        let summary = self.prompt.generate(&prompt).await?;

        Ok(self.prompt.wrap(summary.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{CannedSearch, FixedMemory, ScriptedModel};
    use super::*;
    use crate::adk::error::ConductorError;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_research_combines_memory_and_web() {
        let model = Arc::new(ScriptedModel::new(&["  Asia has 4.6 billion people.\n"]));
        let memory = Arc::new(FixedMemory::new(&["old report on Asia", "unrelated", "third"]));
        let search = Arc::new(CannedSearch::new());
        let step = ResearchStep::new(model.clone(), memory, search.clone(), 2);

        let update = step.run(&WorkflowState::new("population of Asia")).await.unwrap();
        assert_eq!(
            update.get(StateField::NarrativeSummary),
            Some("Asia has 4.6 billion people.")
        );
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);

        let prompt = model.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Memory (Internal Knowledge):\nold report on Asia\n\nunrelated"));
        assert!(!prompt.contains("third"));
        assert!(prompt.contains("World population: Asia 4.6 billion (https://example.org/pop)"));
        assert!(prompt.contains("Plan: \n"));
    }

    #[tokio::test]
    async fn test_empty_memory_is_labelled() {
        let step = ResearchStep::new(
            Arc::new(ScriptedModel::new(&["summary"])),
            Arc::new(FixedMemory::new(&[])),
            Arc::new(CannedSearch::new()),
            5,
        );

        let context = step.gather_context("anything").await.unwrap();
        assert!(context.starts_with("Memory (Internal Knowledge):\nNo stored knowledge."));
    }

    #[tokio::test]
    async fn test_memory_failure_is_a_store_error() {
        let model = Arc::new(ScriptedModel::new(&["never"]));
        let step = ResearchStep::new(
            model.clone(),
            Arc::new(FixedMemory::failing()),
            Arc::new(CannedSearch::new()),
            5,
        );

        let err = step.run(&WorkflowState::new("x")).await.unwrap_err();
        assert!(matches!(err, ConductorError::Store(_)));
        assert_eq!(model.calls(), 0);
    }
}
