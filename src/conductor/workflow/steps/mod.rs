// SPDX-License-Identifier: MIT

//! Built-in agent steps.
//!
//! Plan, Code and Write are plain [`PromptStep`]s. Research, Extract,
//! Visualize and the analysis report need collaborators or post-processing
//! and have their own types.

pub mod extract;
pub mod prompts;
pub mod report;
pub mod research;
pub mod visualize;

pub use extract::{locate_series_start, ExtractStep};
pub use report::{compose_report, AnalysisReportStep};
pub use research::ResearchStep;
pub use visualize::VisualizeStep;

use crate::adk::agent::PromptTemplate;
use crate::conductor::workflow::agent::PromptStep;
use crate::adk::model::Model;
use crate::conductor::workflow::state::StateField;
use std::sync::Arc;

pub const PLANNER: &str = "planner";
pub const RESEARCHER: &str = "researcher";
pub const CODER: &str = "coder";
pub const WRITER: &str = "writer";
pub const EXTRACTOR: &str = "extractor";
pub const VISUALIZER: &str = "visualizer";
pub const ANALYSIS_REPORT: &str = "analysis_report";

/// Plan: objective -> plan. Resets the narrative summary.
pub fn planner(model: Arc<dyn Model>) -> PromptStep {
    PromptStep::new(
        PLANNER,
        PromptTemplate::new(prompts::PLANNER),
        model,
        vec![StateField::Objective],
        StateField::Plan,
    )
    .clearing(StateField::NarrativeSummary)
}

/// Code: objective, narrative summary -> code
pub fn coder(model: Arc<dyn Model>) -> PromptStep {
    PromptStep::new(
        CODER,
        PromptTemplate::new(prompts::CODER),
        model,
        vec![StateField::Objective, StateField::NarrativeSummary],
        StateField::Code,
    )
}

/// Write: objective, plan, narrative summary, code -> report
pub fn writer(model: Arc<dyn Model>) -> PromptStep {
    PromptStep::new(
        WRITER,
        PromptTemplate::new(prompts::WRITER),
        model,
        vec![
            StateField::Objective,
            StateField::Plan,
            StateField::NarrativeSummary,
            StateField::Code,
        ],
        StateField::Report,
    )
}
