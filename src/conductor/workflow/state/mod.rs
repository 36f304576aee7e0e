// SPDX-License-Identifier: MIT

//! State management for workflows
//!
//! This module provides:
//! - `StateField` - names the slots of the workflow state
//! - `WorkflowState` - the per-request state threaded through the steps
//! - `StateUpdate` - the partial update a step returns

mod fields;
mod store;

pub use fields::StateField;
pub use store::{StateUpdate, WorkflowState};
