// SPDX-License-Identifier: MIT

pub mod archive;
pub mod chart;
pub mod config;
pub mod memory;
pub mod orchestrator;
pub mod server;
pub mod tools;
pub mod workflow;
