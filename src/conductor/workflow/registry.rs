// SPDX-License-Identifier: MIT

use crate::conductor::workflow::agent::AgentStep;
use crate::adk::error::ConductorError;
use crate::conductor::workflow::state::StateField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Agents a caller may dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Planner,
    Researcher,
    Coder,
    Writer,
    AnalystVisualizer,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Planner,
        AgentKind::Researcher,
        AgentKind::Coder,
        AgentKind::Writer,
        AgentKind::AnalystVisualizer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Planner => "planner",
            AgentKind::Researcher => "researcher",
            AgentKind::Coder => "coder",
            AgentKind::Writer => "writer",
            AgentKind::AnalystVisualizer => "analyst_visualizer",
        }
    }

    /// State field returned to the caller
    pub fn output_field(self) -> StateField {
        match self {
            AgentKind::Planner => StateField::Plan,
            AgentKind::Researcher => StateField::NarrativeSummary,
            AgentKind::Coder => StateField::Code,
            AgentKind::Writer | AgentKind::AnalystVisualizer => StateField::Report,
        }
    }

    pub fn is_composite(self) -> bool {
        matches!(self, AgentKind::AnalystVisualizer)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = ConductorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConductorError::InvalidRequest(s.to_string()))
    }
}

/// Steps by name, built once at startup
#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: HashMap<String, Arc<dyn AgentStep>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, step: Arc<dyn AgentStep>) {
        self.steps.insert(step.name().to_string(), step);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentStep>> {
        self.steps.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
