// SPDX-License-Identifier: MIT

//! Graph node types

use crate::adk::error::ConductorError;
use crate::conductor::workflow::state::{StateField, WorkflowState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a guarded workflow stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Abort {
    EmptyResearch,
    ExtractionFailed,
}

impl Abort {
    pub fn into_error(self) -> ConductorError {
        match self {
            Abort::EmptyResearch => ConductorError::EmptyResearch,
            Abort::ExtractionFailed => ConductorError::ExtractionFailed { raw: String::new() },
        }
    }
}

/// Post-condition checked after a node completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// `field` must hold non-blank text, otherwise abort
    RequireNonEmpty(StateField, Abort),
}

impl Guard {
    pub fn check(&self, state: &WorkflowState) -> Result<(), ConductorError> {
        match self {
            Guard::RequireNonEmpty(field, abort) => {
                if state.is_populated(*field) {
                    Ok(())
                } else {
                    log::warn!("Guard tripped: '{}' is empty", field);
                    Err(abort.into_error())
                }
            }
        }
    }
}

/// Next step of the general pipeline as chosen by the conditional router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Research,
    Code,
    Write,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Route::Research => "research",
            Route::Code => "code",
            Route::Write => "write",
        };
        f.write_str(s)
    }
}

/// Conditional router for the general pipeline.
///
/// Not wired into any workflow; the built pipeline is strictly linear.
pub fn route_next(state: &WorkflowState) -> Route {
    if !state.is_populated(StateField::NarrativeSummary) {
        Route::Research
    } else if !state.is_populated(StateField::Code) {
        Route::Code
    } else {
        Route::Write
    }
}
