use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Severity;

/// A finding as reported by the analysis collaborator, with line numbers
/// still local to the analyzed chunk (1-based). The scheduler validates and
/// remaps these into [`crate::Finding`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawFinding {
    /// Chunk-local 1-based line numbers.
    pub lines: Vec<u32>,

    pub severity: Severity,

    pub category: String,

    pub description: String,

    #[serde(default)]
    pub risk_snippet: String,

    #[serde(default)]
    pub payload_example: String,

    #[serde(default)]
    pub remediation: String,
}

impl RawFinding {
    /// True when the category is the "nothing found" sentinel. Such findings
    /// are discarded before publication.
    #[must_use]
    pub fn is_clean_marker(&self) -> bool {
        self.category.trim().eq_ignore_ascii_case("none")
    }
}

/// Why an analysis call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Credentials rejected. Fatal for the whole job.
    Auth,

    /// Timeout, connection error, rate limiting, server error. The unit is
    /// skipped with progress credited; retrying is the collaborator's job.
    Transient,

    /// The reply could not be decoded into findings. Treated as a
    /// zero-finding success.
    Malformed,
}

/// A categorized analysis failure with human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl AnalysisFailure {
    pub fn auth(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Auth,
            detail: detail.into(),
        }
    }

    pub fn transient(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Malformed,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            FailureKind::Auth => "authentication failure",
            FailureKind::Transient => "transient failure",
            FailureKind::Malformed => "malformed response",
        };
        write!(f, "{kind}: {}", self.detail)
    }
}

/// Outcome of one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Findings(Vec<RawFinding>),
    Failure(AnalysisFailure),
}

/// The external analysis collaborator.
///
/// Implementations own their transport, per-call timeout, and retry budget;
/// the scheduler only sees this contract. A call that never returns
/// permanently occupies a worker slot, so implementations should always
/// bound their own latency.
#[async_trait]
pub trait AnalysisCall: Send + Sync {
    async fn analyze(&self, chunk_text: &str, language_tag: &str) -> AnalysisResult;
}
