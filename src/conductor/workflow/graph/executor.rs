//! Graph workflow executor

use crate::conductor::workflow::agent::AgentStep;
use crate::adk::error::Result;
use crate::conductor::workflow::state::WorkflowState;
use std::sync::Arc;

use super::types::Guard;

/// Compiled node ready for execution
pub struct CompiledNode {
    pub id: String,
    pub step: Arc<dyn AgentStep>,
    pub guard: Option<Guard>,
}

impl CompiledNode {
    pub fn new(id: impl Into<String>, step: Arc<dyn AgentStep>) -> Self {
        Self {
            id: id.into(),
            step,
            guard: None,
        }
    }

    pub fn guarded(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }
}

/// Final state of a completed run plus the nodes it went through
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub state: WorkflowState,
    pub visited: Vec<String>,
}

/// Sequential graph executor
pub struct GraphWorkflow {
    name: String,
    nodes: Vec<CompiledNode>,
}

impl GraphWorkflow {
    pub fn new(name: impl Into<String>, nodes: Vec<CompiledNode>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node ids in execution order
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Run every node in order against `state`.
    ///
    /// The first failing node or tripped guard aborts the run; later nodes
    /// never execute.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowRun> {
        let mut visited = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            log::info!("Workflow {}: executing node {}", self.name, node.id);

            let update = node.step.run(&state).await.map_err(|e| {
                log::error!("Node {} failed: {}", node.id, e);
                e
            })?;
            state.apply(update);
            visited.push(node.id.clone());

            if let Some(guard) = &node.guard {
                guard.check(&state)?;
            }
            log::info!("Node {} completed", node.id);
        }

        Ok(WorkflowRun { state, visited })
    }
}
