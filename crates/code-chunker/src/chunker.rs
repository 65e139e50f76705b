use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::java::chunk_java;
use crate::language::LanguageTag;
use crate::markup::chunk_markup;
use crate::merge::{merge_trivial_chunks, CommentStyle};
use crate::php::chunk_php;
use crate::types::{Chunk, ChunkKind};

/// Structural chunker: decomposes source text into ordered, non-overlapping
/// chunks covering the whole file.
///
/// `chunk` never fails and never panics on input: any scan inconsistency or
/// coverage violation degrades to a single whole-file chunk labeled
/// "unparsed".
pub struct StructuralChunker {
    config: ChunkerConfig,
}

impl StructuralChunker {
    /// Create a chunker with configuration.
    #[must_use]
    pub fn new(config: ChunkerConfig) -> Self {
        config
            .validate()
            .expect("Invalid chunker configuration provided");
        Self { config }
    }

    /// Chunk source text for a language tag.
    ///
    /// The returned chunks are ordered by `start_line` and cover lines
    /// `1..=N` exactly once. Empty input yields no chunks.
    pub fn chunk(&self, text: &str, language: LanguageTag) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = text.lines().collect();

        match self.chunk_lines(&lines, language) {
            Ok(chunks) => chunks,
            Err(e) => {
                log::warn!("structural scan failed ({language}): {e}; falling back to whole file");
                vec![Self::fallback_chunk(&lines)]
            }
        }
    }

    fn chunk_lines(&self, lines: &[&str], language: LanguageTag) -> Result<Vec<Chunk>> {
        let raw = match language {
            LanguageTag::Java => chunk_java(lines, &self.config)?,
            LanguageTag::Php => chunk_php(lines, &self.config)?,
            LanguageTag::Markup => chunk_markup(lines)?,
            LanguageTag::Other => self.fixed_windows(lines),
        };

        let mut chunks = if self.config.merge_small_chunks {
            let style = match language {
                LanguageTag::Markup => CommentStyle::Markup,
                _ => CommentStyle::CLike,
            };
            merge_trivial_chunks(raw, language.min_merge_lines(), style)
        } else {
            raw
        };

        chunks.sort_by_key(|chunk| chunk.start_line);
        verify_coverage(&chunks, lines.len())?;

        Ok(chunks)
    }

    /// Fixed-size windows for languages without a structural scanner.
    fn fixed_windows(&self, lines: &[&str]) -> Vec<Chunk> {
        let window = self.config.window_lines;
        let mut chunks = Vec::with_capacity(lines.len() / window + 1);
        let mut start = 0;

        while start < lines.len() {
            let end = (start + window).min(lines.len());
            chunks.push(Chunk::new(
                lines[start..end].join("\n"),
                start + 1,
                end,
                ChunkKind::FixedWindow,
                "fixed-window",
            ));
            start = end;
        }

        chunks
    }

    /// The whole-file fallback chunk used when a scan cannot be trusted.
    fn fallback_chunk(lines: &[&str]) -> Chunk {
        Chunk::new(
            lines.join("\n"),
            1,
            lines.len(),
            ChunkKind::Unparsed,
            "unparsed",
        )
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Summarize a chunk list.
    #[must_use]
    pub fn stats(chunks: &[Chunk]) -> ChunkingStats {
        ChunkingStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(Chunk::line_count).sum(),
            min_lines: chunks.iter().map(Chunk::line_count).min().unwrap_or(0),
            max_lines: chunks.iter().map(Chunk::line_count).max().unwrap_or(0),
        }
    }
}

impl Default for StructuralChunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

/// Every line covered exactly once, in order.
fn verify_coverage(chunks: &[Chunk], total_lines: usize) -> Result<()> {
    let mut expected = 1usize;

    for chunk in chunks {
        if chunk.start_line != expected {
            return Err(ChunkerError::coverage(format!(
                "chunk starts at line {}, expected {expected}",
                chunk.start_line
            )));
        }
        if chunk.end_line < chunk.start_line {
            return Err(ChunkerError::coverage(format!(
                "chunk range {}..{} inverted",
                chunk.start_line, chunk.end_line
            )));
        }
        expected = chunk.end_line + 1;
    }

    if expected != total_lines + 1 {
        return Err(ChunkerError::coverage(format!(
            "chunks end at line {}, file has {total_lines} lines",
            expected - 1
        )));
    }

    Ok(())
}

/// Statistics about a chunking result.
#[derive(Debug, Clone)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub min_lines: usize,
    pub max_lines: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Range: {}-{}",
            self.total_chunks, self.total_lines, self.min_lines, self.max_lines
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = StructuralChunker::default();
        assert!(chunker.chunk("", LanguageTag::Java).is_empty());
    }

    #[test]
    fn small_default_file_is_one_window() {
        let chunker = StructuralChunker::default();
        let chunks = chunker.chunk("a\nb\nc", LanguageTag::Other);
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 3));
        assert_eq!(chunks[0].kind, ChunkKind::FixedWindow);
        assert_eq!(chunks[0].label, "fixed-window");
    }

    #[test]
    fn long_default_file_splits_into_windows() {
        let chunker = StructuralChunker::default();
        let text = vec!["x"; 450].join("\n");
        let chunks = chunker.chunk(&text, LanguageTag::Other);
        assert_eq!(chunks.len(), 3);
        assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 200));
        assert_eq!((chunks[1].start_line, chunks[1].end_line), (201, 400));
        assert_eq!((chunks[2].start_line, chunks[2].end_line), (401, 450));
    }

    #[test]
    fn unbalanced_braces_fall_back_to_whole_file() {
        let chunker = StructuralChunker::default();
        let text = "}}}\nclass Broken {\n}";
        let chunks = chunker.chunk(text, LanguageTag::Java);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, ChunkKind::Unparsed);
        assert_eq!(chunks[0].label, "unparsed");
        assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 3));
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn coverage_holds_for_all_language_tags() {
        let chunker = StructuralChunker::default();
        let samples = [
            (
                LanguageTag::Java,
                "import a.B;\n\nclass C {\n    void f() {\n    }\n}\n",
            ),
            (
                LanguageTag::Php,
                "<?php\nclass D {\n    function g() {\n    }\n}\n",
            ),
            (
                LanguageTag::Markup,
                "<project>\n    <properties>\n        <x>1</x>\n    </properties>\n</project>\n",
            ),
            (LanguageTag::Other, "just\nsome\ntext\n"),
        ];

        for (language, text) in samples {
            let chunks = chunker.chunk(text, language);
            let mut expected = 1;
            for chunk in &chunks {
                assert_eq!(chunk.start_line, expected, "gap in {language} chunks");
                expected = chunk.end_line + 1;
            }
            assert_eq!(expected, text.lines().count() + 1, "{language} tail");
        }
    }

    #[test]
    fn verify_coverage_rejects_gaps_and_overlaps() {
        let mk = |s, e| Chunk::new("x", s, e, ChunkKind::Other, "other");
        assert!(verify_coverage(&[mk(1, 3), mk(4, 5)], 5).is_ok());
        assert!(verify_coverage(&[mk(1, 3), mk(5, 6)], 6).is_err());
        assert!(verify_coverage(&[mk(1, 3), mk(3, 5)], 5).is_err());
        assert!(verify_coverage(&[mk(1, 3)], 5).is_err());
        assert!(verify_coverage(&[], 0).is_ok());
    }

    #[test]
    fn stats_summarize_chunks() {
        let chunker = StructuralChunker::default();
        let text = vec!["y"; 250].join("\n");
        let chunks = chunker.chunk(&text, LanguageTag::Other);
        let stats = StructuralChunker::stats(&chunks);
        assert_eq!(stats.total_chunks, 2);
        assert_eq!(stats.total_lines, 250);
        assert_eq!(stats.min_lines, 50);
        assert_eq!(stats.max_lines, 200);
    }
}
