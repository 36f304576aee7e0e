// SPDX-License-Identifier: MIT

use crate::conductor::workflow::agent::AgentStep;
use crate::adk::error::{ConductorError, Result};
use crate::conductor::chart::ChartRenderer;
use crate::conductor::workflow::state::{StateField, StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

const UNTITLED: &str = "Untitled chart";
const READS: [StateField; 2] = [StateField::Objective, StateField::StructuredSeries];

/// Renders `structured_series` as a chart titled with the objective and
/// stores the markdown image link in `chart`
pub struct VisualizeStep {
    renderer: Arc<ChartRenderer>,
}

impl VisualizeStep {
    pub fn new(renderer: Arc<ChartRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl AgentStep for VisualizeStep {
    fn name(&self) -> &str {
        super::VISUALIZER
    }

    fn reads(&self) -> &[StateField] {
        &READS
    }

    fn produces(&self) -> StateField {
        StateField::Chart
    }

    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate> {
        if !state.is_populated(StateField::StructuredSeries) {
            return Err(ConductorError::NoInputData);
        }

        let title = match state.objective.trim() {
            "" => UNTITLED,
            t => t,
        };
        let artifact = self
            .renderer
            .render(state.text(StateField::StructuredSeries), title)
            .await?;

        Ok(StateUpdate::of(StateField::Chart, artifact.markdown))
    }
}
