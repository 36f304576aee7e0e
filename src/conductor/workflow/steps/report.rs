// SPDX-License-Identifier: MIT

use crate::conductor::workflow::agent::AgentStep;
use crate::adk::error::Result;
use crate::conductor::workflow::state::{StateField, StateUpdate, WorkflowState};
use async_trait::async_trait;

const READS: [StateField; 3] = [
    StateField::Objective,
    StateField::NarrativeSummary,
    StateField::Chart,
];

/// Final markdown for the analyst/visualizer workflow
pub fn compose_report(objective: &str, summary: &str, chart: &str) -> String {
    format!(
        "# Analysis Report: {}\n\n## Research Summary\n\n{}\n\n## Data Visualization\n\n{}",
        objective, summary, chart
    )
}

/// Assembles the analysis report from state. Makes no model call.
pub struct AnalysisReportStep;

#[async_trait]
impl AgentStep for AnalysisReportStep {
    fn name(&self) -> &str {
        super::ANALYSIS_REPORT
    }

    fn reads(&self) -> &[StateField] {
        &READS
    }

    fn produces(&self) -> StateField {
        StateField::Report
    }

    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate> {
        let report = compose_report(
            &state.objective,
            state.text(StateField::NarrativeSummary),
            state.text(StateField::Chart),
        );
        Ok(StateUpdate::of(StateField::Report, report))
    }
}
