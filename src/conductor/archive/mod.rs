// SPDX-License-Identifier: MIT

//! Report archive.
//!
//! Every successful dispatch is written under the history directory as a
//! markdown file and a PDF sharing one timestamped stem, then fed back into
//! memory. File failures are logged and swallowed; a memory failure is not.

pub mod pdf;

use crate::adk::error::Result;
use crate::conductor::memory::{MemoryStore, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const OBJECTIVE_PREFIX_CHARS: usize = 30;
pub const REPORT_SOURCE: &str = "self_generated_report";

/// Where an archived report ended up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchivedReport {
    /// `None` when the write failed
    pub markdown: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
    pub chunks: usize,
}

pub struct ReportArchive {
    dir: PathBuf,
    memory: Arc<dyn MemoryStore>,
}

impl ReportArchive {
    pub fn new(dir: impl Into<PathBuf>, memory: Arc<dyn MemoryStore>) -> Self {
        Self {
            dir: dir.into(),
            memory,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Archive `report` to disk and memory
    pub async fn save(
        &self,
        report: &str,
        objective: &str,
        agent: &str,
    ) -> Result<ArchivedReport> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let stem = format!("{}_{}_{}", stamp, agent, sanitize_objective(objective));

        let mut archived = ArchivedReport::default();
        match tokio::fs::create_dir_all(&self.dir).await {
            Ok(()) => {
                let md_path = self.dir.join(format!("{}.md", stem));
                archived.markdown = write_logged(&md_path, report.as_bytes()).await;

                let pdf_path = self.dir.join(format!("{}.pdf", stem));
                let bytes = pdf::render_text_pdf(report);
                archived.pdf = write_logged(&pdf_path, &bytes).await;
            }
            Err(e) => log::error!(
                "Failed to create history directory {}: {}",
                self.dir.display(),
                e
            ),
        }

        log::info!("Updating memory with the result of agent '{}'", agent);
        let metadata: Metadata = [
            ("source", REPORT_SOURCE),
            ("agent", agent),
            ("objective", objective),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        archived.chunks = self.memory.put(report, metadata).await?;

        Ok(archived)
    }
}

async fn write_logged(path: &Path, bytes: &[u8]) -> Option<PathBuf> {
    match tokio::fs::write(path, bytes).await {
        Ok(()) => {
            log::info!("Report saved: {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            log::error!("Failed to save report {}: {}", path.display(), e);
            None
        }
    }
}

/// File-name-safe prefix of an objective: the first 30 characters, keeping
/// letters, digits, space, `_` and `-`, trimmed
pub fn sanitize_objective(objective: &str) -> String {
    objective
        .chars()
        .take(OBJECTIVE_PREFIX_CHARS)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}
