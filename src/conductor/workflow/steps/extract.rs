// SPDX-License-Identifier: MIT

//! Data extraction: narrative text to a `label:value, ...` series.
//!
//! The model is asked for the bare series with a few-shot prompt, and its
//! reply is then cleaned by [`locate_series_start`]. The cleaned text is not
//! validated further here; strict parsing is the chart renderer's job.

use super::prompts;
use crate::adk::agent::{preview, PromptTemplate};
use crate::conductor::workflow::agent::{AgentStep, PromptStep};
use crate::adk::error::{ConductorError, Result};
use crate::adk::model::Model;
use crate::conductor::workflow::state::{StateField, StateUpdate, WorkflowState};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Label starting with a word character, a colon, then a decimal number
static SERIES_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w[\w\s]*:\s*\d+(\.\d+)?").expect("series pattern is valid"));

/// Locate where label:value data begins inside a chatty reply.
///
/// Returns everything from the first match onward, trimmed. Pairs after the
/// first are taken verbatim. Applying it to its own output is a no-op.
pub fn locate_series_start(text: &str) -> Option<&str> {
    SERIES_START
        .find(text)
        .map(|m| text[m.start()..].trim())
}

/// Reads `narrative_summary`, writes `structured_series`
pub struct ExtractStep {
    prompt: PromptStep,
}

impl ExtractStep {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            prompt: PromptStep::new(
                super::EXTRACTOR,
                PromptTemplate::new(prompts::EXTRACTOR),
                model,
                vec![StateField::NarrativeSummary],
                StateField::StructuredSeries,
            ),
        }
    }
}

#[async_trait]
impl AgentStep for ExtractStep {
    fn name(&self) -> &str {
        self.prompt.name()
    }

    fn reads(&self) -> &[StateField] {
        self.prompt.reads()
    }

    fn produces(&self) -> StateField {
        StateField::StructuredSeries
    }

    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate> {
        if !state.is_populated(StateField::NarrativeSummary) {
            return Err(ConductorError::NoInputData);
        }

        let prompt = self.prompt.render_with(state, &[])?;
        let raw = self.prompt.generate(&prompt).await?;
        log::debug!("Raw extractor output: '{}'", raw);

        match locate_series_start(&raw) {
            Some(cleaned) => {
                log::info!("Extracted series: '{}'", preview(cleaned, 200));
                Ok(self.prompt.wrap(cleaned))
            }
            None => {
                log::error!("Extractor found no label:value data in model output");
                Err(ConductorError::ExtractionFailed { raw })
            }
        }
    }
}
