// SPDX-License-Identifier: MIT

//! Prompt templates with `{name}` placeholders

use crate::adk::error::{ConductorError, Result};
use std::collections::HashMap;

/// A prompt template. `{name}` is substituted from the supplied variables;
/// `{{` and `}}` render literal braces.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render the template. Unknown placeholders are an error rather than
    /// leaking into the prompt verbatim.
    pub fn render(&self, vars: &HashMap<&str, String>) -> Result<String> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("{{") {
                out.push('{');
                rest = &tail[2..];
            } else if tail.starts_with("}}") {
                out.push('}');
                rest = &tail[2..];
            } else if tail.starts_with('{') {
                let end = tail.find('}').ok_or_else(|| {
                    ConductorError::Template("unclosed '{' in template".to_string())
                })?;
                let name = &tail[1..end];
                let value = vars.get(name).ok_or_else(|| {
                    ConductorError::Template(format!("missing template variable '{}'", name))
                })?;
                out.push_str(value);
                rest = &tail[end + 1..];
            } else {
                return Err(ConductorError::Template(
                    "unmatched '}' in template".to_string(),
                ));
            }
        }
        out.push_str(rest);

        Ok(out)
    }

    /// Placeholder names in order of appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(pos) = rest.find('{') {
            let tail = &rest[pos..];
            if tail.starts_with("{{") {
                rest = &tail[2..];
                continue;
            }
            match tail.find('}') {
                Some(end) => {
                    names.push(&tail[1..end]);
                    rest = &tail[end + 1..];
                }
                None => break,
            }
        }
        names
    }
}
