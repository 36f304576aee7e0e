// SPDX-License-Identifier: MIT

pub mod agent;
pub mod builder;
pub mod graph;
pub mod registry;
pub mod state;
pub mod steps;
