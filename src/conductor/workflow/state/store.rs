// SPDX-License-Identifier: MIT

//! Runtime state storage for workflow execution

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::StateField;

/// Per-request workflow state.
///
/// Fields are only ever set or overwritten by [`WorkflowState::apply`];
/// nothing removes a field once present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub objective: String,
    pub plan: Option<String>,
    pub narrative_summary: Option<String>,
    pub structured_series: Option<String>,
    pub code: Option<String>,
    pub chart: Option<String>,
    pub report: Option<String>,
}

/// Partial update returned by a step. `None` means "not computed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl WorkflowState {
    /// Create a fresh state for one request
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            ..Default::default()
        }
    }

    /// Create a state seeded with caller-supplied research context
    pub fn with_context(objective: impl Into<String>, context: Option<String>) -> Self {
        Self {
            objective: objective.into(),
            narrative_summary: Some(context.unwrap_or_default()),
            ..Default::default()
        }
    }

    /// Get a field value
    pub fn get(&self, field: StateField) -> Option<&str> {
        match field {
            StateField::Objective => Some(self.objective.as_str()),
            StateField::Plan => self.plan.as_deref(),
            StateField::NarrativeSummary => self.narrative_summary.as_deref(),
            StateField::StructuredSeries => self.structured_series.as_deref(),
            StateField::Code => self.code.as_deref(),
            StateField::Chart => self.chart.as_deref(),
            StateField::Report => self.report.as_deref(),
        }
    }

    /// Get a field value, treating absent as empty
    pub fn text(&self, field: StateField) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// Whether a field holds non-blank text
    pub fn is_populated(&self, field: StateField) -> bool {
        !self.text(field).trim().is_empty()
    }

    /// Merge a partial update. Fields absent from the update are left untouched.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            plan,
            narrative_summary,
            structured_series,
            code,
            chart,
            report,
        } = update;

        merge(&mut self.plan, plan);
        merge(&mut self.narrative_summary, narrative_summary);
        merge(&mut self.structured_series, structured_series);
        merge(&mut self.code, code);
        merge(&mut self.chart, chart);
        merge(&mut self.report, report);
    }

    /// Convert state to JSON object
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

impl StateUpdate {
    /// Update carrying a single field.
    ///
    /// The objective is immutable; setting it is ignored with a warning.
    pub fn of(field: StateField, value: impl Into<String>) -> Self {
        Self::default().with(field, value)
    }

    /// Add a field to this update
    pub fn with(mut self, field: StateField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            StateField::Objective => {
                log::warn!("Ignoring attempt to overwrite the objective");
            }
            StateField::Plan => self.plan = value,
            StateField::NarrativeSummary => self.narrative_summary = value,
            StateField::StructuredSeries => self.structured_series = value,
            StateField::Code => self.code = value,
            StateField::Chart => self.chart = value,
            StateField::Report => self.report = value,
        }
        self
    }

    /// Get a field value carried by this update
    pub fn get(&self, field: StateField) -> Option<&str> {
        match field {
            StateField::Objective => None,
            StateField::Plan => self.plan.as_deref(),
            StateField::NarrativeSummary => self.narrative_summary.as_deref(),
            StateField::StructuredSeries => self.structured_series.as_deref(),
            StateField::Code => self.code.as_deref(),
            StateField::Chart => self.chart.as_deref(),
            StateField::Report => self.report.as_deref(),
        }
    }
}
