// SPDX-License-Identifier: MIT

//! Agent steps - units of work over the workflow state
//!
//! An agent step reads a subset of the workflow state and returns a partial
//! update carrying the fields it computed.

mod prompt;

pub use prompt::PromptStep;

use super::state::{StateField, StateUpdate, WorkflowState};
use crate::adk::error::Result;
use async_trait::async_trait;

/// Core trait for all agent steps
#[async_trait]
pub trait AgentStep: Send + Sync {
    /// Returns the step name
    fn name(&self) -> &str;

    /// State fields this step reads
    fn reads(&self) -> &[StateField];

    /// The designated output field
    fn produces(&self) -> StateField;

    /// Run the step against the current state
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate>;
}
