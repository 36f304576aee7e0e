//! Strict parsing of `label:value, label:value, ...` text.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("segment '{0}' is not a label:value pair")]
    MissingColon(String),

    #[error("segment '{0}' has an empty label")]
    EmptyLabel(String),

    #[error("could not convert string to float: '{0}'")]
    InvalidValue(String),

    #[error("value '{0}' is not a finite number")]
    NonFinite(String),
}

/// One bar of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Ordered label/value pairs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedSeries {
    points: Vec<SeriesPoint>,
}

impl ExtractedSeries {
    /// Parse fail-fast: any bad segment rejects the whole input.
    ///
    /// Segments are split on commas and trimmed; each segment is split on
    /// its first colon, so `a:1:2` is rejected as an invalid value.
    pub fn parse(text: &str) -> Result<Self, SeriesError> {
        let points = text
            .split(',')
            .map(str::trim)
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn parse_segment(segment: &str) -> Result<SeriesPoint, SeriesError> {
    let (label, value_text) = segment
        .split_once(':')
        .ok_or_else(|| SeriesError::MissingColon(segment.to_string()))?;

    let label = label.trim();
    if label.is_empty() {
        return Err(SeriesError::EmptyLabel(segment.to_string()));
    }

    let value_text = value_text.trim();
    let value: f64 = value_text
        .parse()
        .map_err(|_| SeriesError::InvalidValue(value_text.to_string()))?;
    if !value.is_finite() {
        return Err(SeriesError::NonFinite(value_text.to_string()));
    }

    Ok(SeriesPoint {
        label: label.to_string(),
        value,
    })
}

impl FromStr for ExtractedSeries {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExtractedSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", p.label, p.value)?;
        }
        Ok(())
    }
}
