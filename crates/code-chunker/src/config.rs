use serde::{Deserialize, Serialize};

/// Configuration for the structural chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Window size, in lines, for languages chunked without structure.
    pub window_lines: usize,

    /// How many subsequent non-blank, non-comment lines to inspect when
    /// deciding whether a closing brace ends the current chunk.
    pub lookahead_lines: usize,

    /// Whether the merge post-pass folds comment-only and undersized chunks
    /// into their neighbors.
    pub merge_small_chunks: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            window_lines: 200,
            lookahead_lines: 20,
            merge_small_chunks: true,
        }
    }
}

impl ChunkerConfig {
    /// Validate configuration bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.window_lines == 0 {
            return Err("window_lines must be > 0".to_string());
        }

        if self.lookahead_lines == 0 {
            return Err("lookahead_lines must be > 0".to_string());
        }

        Ok(())
    }
}
