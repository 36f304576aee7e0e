// SPDX-License-Identifier: MIT

//! Agent module - prompt-driven building blocks for AI workflows
//!
//! - `LlmAgent` - renders one prompt template and makes one LLM call
//! - `PromptTemplate` - `{name}` substitution for prompt text

mod llm;
mod template;

pub use llm::{preview, LlmAgent};
pub use template::PromptTemplate;
