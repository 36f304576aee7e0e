// SPDX-License-Identifier: MIT

//! Graph-based workflow execution
//!
//! Workflows are ordered node lists run strictly in sequence, each node
//! merging its partial update into the shared state. Guards abort the run
//! when a node leaves a required field empty.

pub mod executor;
pub mod types;

pub use executor::{CompiledNode, GraphWorkflow, WorkflowRun};
pub use types::{route_next, Abort, Guard, Route};
