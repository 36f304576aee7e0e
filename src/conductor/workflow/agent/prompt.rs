// SPDX-License-Identifier: MIT

//! Prompt step - an [`LlmAgent`] bound to state fields
//!
//! The step renders its template from the fields it reads and wraps the
//! completion as its designated field.

use super::AgentStep;
use crate::adk::agent::{LlmAgent, PromptTemplate};
use crate::adk::error::Result;
use crate::adk::model::Model;
use crate::conductor::workflow::state::{StateField, StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Standard template-to-LLM step
pub struct PromptStep {
    agent: LlmAgent,
    reads: Vec<StateField>,
    produces: StateField,
    /// Fields reset to empty alongside the output
    clears: Vec<StateField>,
}

impl PromptStep {
    pub fn new(
        name: impl Into<String>,
        template: PromptTemplate,
        model: Arc<dyn Model>,
        reads: Vec<StateField>,
        produces: StateField,
    ) -> Self {
        Self {
            agent: LlmAgent::new(name, template, model),
            reads,
            produces,
            clears: Vec::new(),
        }
    }

    /// Also reset `field` to empty whenever this step runs
    pub fn clearing(mut self, field: StateField) -> Self {
        self.clears.push(field);
        self
    }

    /// Template variables drawn from the fields this step reads
    pub fn variables(&self, state: &WorkflowState) -> HashMap<&'static str, String> {
        self.reads
            .iter()
            .map(|f| (f.key(), state.text(*f).to_string()))
            .collect()
    }

    /// Render the prompt with additional, non-state variables
    pub fn render_with(
        &self,
        state: &WorkflowState,
        extra: &[(&'static str, String)],
    ) -> Result<String> {
        let mut vars = self.variables(state);
        for (k, v) in extra {
            vars.insert(*k, v.clone());
        }
        self.agent.render(&vars)
    }

    /// Send a rendered prompt and return the raw completion
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.agent.generate(prompt).await
    }

    /// Send a rendered prompt and wrap the completion as the output field
    pub async fn complete(&self, prompt: &str) -> Result<StateUpdate> {
        let text = self.generate(prompt).await?;
        Ok(self.wrap(text))
    }

    /// Wrap `text` as the output field, plus any cleared fields
    pub fn wrap(&self, text: impl Into<String>) -> StateUpdate {
        let mut update = StateUpdate::of(self.produces, text);
        for field in &self.clears {
            update = update.with(*field, "");
        }
        update
    }
}

#[async_trait]
impl AgentStep for PromptStep {
    fn name(&self) -> &str {
        &self.agent.name
    }

    fn reads(&self) -> &[StateField] {
        &self.reads
    }

    fn produces(&self) -> StateField {
        self.produces
    }

    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate> {
        let prompt = self.render_with(state, &[])?;
        self.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductor::workflow::steps::testing::ScriptedModel;

    #[tokio::test]
    async fn test_prompt_step_renders_and_wraps() {
        let model = Arc::new(ScriptedModel::new(&["1. research\n2. write"]));
        let step = PromptStep::new(
            "planner",
            PromptTemplate::new("Plan for: {objective}"),
            model.clone(),
            vec![StateField::Objective],
            StateField::Plan,
        );

        let update = step.run(&WorkflowState::new("ship it")).await.unwrap();
        assert_eq!(update.get(StateField::Plan), Some("1. research\n2. write"));
        assert_eq!(model.prompts.lock().unwrap()[0], "Plan for: ship it");
    }

    #[tokio::test]
    async fn test_clearing_resets_field() {
        let step = PromptStep::new(
            "planner",
            PromptTemplate::new("{objective}"),
            Arc::new(ScriptedModel::new(&["plan"])),
            vec![StateField::Objective],
            StateField::Plan,
        )
        .clearing(StateField::NarrativeSummary);

        let update = step.run(&WorkflowState::new("x")).await.unwrap();
        assert_eq!(update.get(StateField::NarrativeSummary), Some(""));
    }

    #[test]
    fn test_render_with_extra_variables() {
        let step = PromptStep::new(
            "researcher",
            PromptTemplate::new("{objective} / {context}"),
            Arc::new(ScriptedModel::new(&["x"])),
            vec![StateField::Objective],
            StateField::NarrativeSummary,
        );

        let prompt = step
            .render_with(&WorkflowState::new("goal"), &[("context", "notes".into())])
            .unwrap();
        assert_eq!(prompt, "goal / notes");
    }
}
