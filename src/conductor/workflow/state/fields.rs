// SPDX-License-Identifier: MIT

//! Field names of the workflow state

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named slot of [`WorkflowState`](super::WorkflowState)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// The user's goal. Set once, never updated.
    Objective,
    Plan,
    /// Free-text research narrative
    NarrativeSummary,
    /// `label:value, label:value` text produced by extraction
    StructuredSeries,
    Code,
    /// Markdown reference to a rendered chart
    Chart,
    /// Terminal output of any path
    Report,
}

impl StateField {
    pub const ALL: [StateField; 7] = [
        StateField::Objective,
        StateField::Plan,
        StateField::NarrativeSummary,
        StateField::StructuredSeries,
        StateField::Code,
        StateField::Chart,
        StateField::Report,
    ];

    /// Key used in prompt templates and JSON renderings
    pub fn key(self) -> &'static str {
        match self {
            StateField::Objective => "objective",
            StateField::Plan => "plan",
            StateField::NarrativeSummary => "narrative_summary",
            StateField::StructuredSeries => "structured_series",
            StateField::Code => "code",
            StateField::Chart => "chart",
            StateField::Report => "report",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
