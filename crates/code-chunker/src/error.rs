use thiserror::Error;

/// Result type for chunker internals.
///
/// These errors never escape [`crate::StructuralChunker::chunk`]; any error
/// raised by a scanner degrades the file to the whole-file fallback chunk.
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while scanning source structure.
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// The line scan lost track of structure (e.g. brace depth underflow).
    #[error("scan inconsistency: {0}")]
    ScanInconsistency(String),

    /// The produced chunks do not cover the file exactly once.
    #[error("coverage violation: {0}")]
    CoverageViolation(String),

    /// A boundary pattern could not be built.
    #[error("pattern error: {0}")]
    PatternError(#[from] regex::Error),
}

impl ChunkerError {
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::ScanInconsistency(msg.into())
    }

    pub fn coverage(msg: impl Into<String>) -> Self {
        Self::CoverageViolation(msg.into())
    }
}
