//! # Sweep Protocol
//!
//! Shared data contract between the structural chunker, the dispatch
//! scheduler, and whatever coordinator consumes the event stream.
//!
//! The crate is a leaf: it knows nothing about chunking strategies, worker
//! pools, or transport. It defines the shapes that cross component
//! boundaries: source units going in, findings and events coming out, and
//! the [`AnalysisCall`] collaborator contract in between.

mod analysis;
pub mod response;

pub use analysis::{AnalysisCall, AnalysisFailure, AnalysisResult, FailureKind, RawFinding};

use serde::{Deserialize, Serialize};

/// One file selected for analysis: path, language tag, and the already
/// loaded text. Immutable for the lifetime of a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path the findings will be reported against.
    pub path: String,

    /// Language tag derived from the file extension (e.g. "java", "php",
    /// "markup", "other").
    pub language_tag: String,

    /// Full file content.
    pub text: String,
}

impl SourceUnit {
    pub fn new(
        path: impl Into<String>,
        language_tag: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            language_tag: language_tag.into(),
            text: text.into(),
        }
    }

    /// Number of lines in the file. Findings are validated against this.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Severity tier of a published finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Parse a severity label case-insensitively. "critical" is folded into
    /// [`Severity::High`]; anything else unknown is rejected.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "critical" => Some(Self::High),
            "medium" | "moderate" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured vulnerability report in file-global coordinates.
///
/// Produced by the scheduler from a [`RawFinding`] after line validation and
/// remapping; never mutated after publication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub file_path: String,

    /// File-global 1-based line numbers, validated against the file length.
    pub lines: Vec<u32>,

    pub severity: Severity,

    /// Vulnerability category (e.g. "sql-injection"). The sentinel "none"
    /// never reaches a published finding.
    pub category: String,

    pub description: String,

    /// Offending code fragment, verbatim.
    #[serde(default)]
    pub risk_snippet: String,

    /// Example attack input demonstrating the issue.
    #[serde(default)]
    pub payload_example: String,

    #[serde(default)]
    pub remediation: String,
}

/// Events published by a job. Consumed exactly once each by a single
/// consumer; `Done` is always the last event visible for a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    /// One or more work units settled.
    Progress { delta: usize },

    /// All findings for a single chunk, published atomically.
    Results {
        path: String,
        findings: Vec<Finding>,
    },

    /// Job-fatal condition (authentication failure). At most one per job.
    Fatal { reason: String },

    /// Terminal event; emitted exactly once per job.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_count_counts_lines() {
        let unit = SourceUnit::new("a.java", "java", "one\ntwo\nthree");
        assert_eq!(unit.line_count(), 3);
        let empty = SourceUnit::new("b.java", "java", "");
        assert_eq!(empty.line_count(), 0);
    }

    #[test]
    fn severity_parses_known_labels() {
        assert_eq!(Severity::parse("High"), Some(Severity::High));
        assert_eq!(Severity::parse(" critical "), Some(Severity::High));
        assert_eq!(Severity::parse("MEDIUM"), Some(Severity::Medium));
        assert_eq!(Severity::parse("low"), Some(Severity::Low));
        assert_eq!(Severity::parse("informational"), None);
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn finding_round_trips_through_json() {
        let finding = Finding {
            file_path: "src/Login.java".to_string(),
            lines: vec![12, 14],
            severity: Severity::High,
            category: "sql-injection".to_string(),
            description: "user input concatenated into query".to_string(),
            risk_snippet: "stmt.execute(q + id)".to_string(),
            payload_example: "1 OR 1=1".to_string(),
            remediation: "use a prepared statement".to_string(),
        };
        let json = serde_json::to_string(&finding).unwrap();
        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, finding);
    }
}
