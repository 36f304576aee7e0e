// SPDX-License-Identifier: MIT

//! Bar chart rendering for extracted label/value series.
//!
//! Charts are written as SVG under the static directory with a timestamped,
//! never-overwritten file name and are referenced by a markdown image link
//! rooted at `/static/`.

pub mod series;
pub mod svg;

pub use series::{ExtractedSeries, SeriesError, SeriesPoint};

use crate::adk::error::{ConductorError, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const DEFAULT_Y_LABEL: &str = "Population (billions)";
const MAX_NAME_ATTEMPTS: usize = 1000;

/// A chart written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub markdown: String,
    pub series: ExtractedSeries,
}

/// Writes bar charts into a static directory
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    static_dir: PathBuf,
    url_prefix: String,
    y_label: String,
}

impl ChartRenderer {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            url_prefix: "/static".to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
        }
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Parse `series_text` and write it as a chart titled `title`.
    ///
    /// Parsing happens before any file is touched, so a malformed series
    /// leaves the static directory unchanged.
    pub async fn render(&self, series_text: &str, title: &str) -> Result<ChartArtifact> {
        let series = ExtractedSeries::parse(series_text)
            .map_err(|e| ConductorError::malformed_series(series_text, e.to_string()))?;

        let body = svg::render_svg(&series, title, &self.y_label);

        tokio::fs::create_dir_all(&self.static_dir).await?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let (path, file_name) = self.write_unique(&stamp, body.as_bytes()).await?;

        log::info!(
            "Chart with {} bars written to {}",
            series.len(),
            path.display()
        );

        Ok(ChartArtifact {
            markdown: format!(
                "![{}]({}/{})",
                escape_alt_text(title),
                self.url_prefix,
                file_name
            ),
            path,
            file_name,
            series,
        })
    }

    async fn write_unique(&self, stamp: &str, bytes: &[u8]) -> Result<(PathBuf, String)> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("chart_{}.svg", stamp)
            } else {
                format!("chart_{}_{}.svg", stamp, attempt)
            };
            let path = self.static_dir.join(&file_name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    return Ok((path, file_name));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ConductorError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free chart file name for timestamp {}", stamp),
        )))
    }
}

/// Backslash-escape the characters that would end a markdown image's alt text
fn escape_alt_text(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if matches!(c, '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Bars recorded in a chart file, in drawing order
pub async fn read_chart_bars(path: impl AsRef<Path>) -> Result<Vec<(String, f64)>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(svg::read_bars(&text))
}
