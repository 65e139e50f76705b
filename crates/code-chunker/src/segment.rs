//! Contiguous segment accumulation.
//!
//! Scanners only record where segments *open*; each segment implicitly ends
//! on the line before the next one opens (the last runs to end of file).
//! Building chunks this way makes the coverage invariant hold by
//! construction: no line can be skipped or claimed twice.

use crate::error::{ChunkerError, Result};
use crate::types::{Chunk, ChunkKind};

struct SegmentStart {
    line_index: usize,
    kind: ChunkKind,
    label: String,
}

pub(crate) struct SegmentBuilder {
    starts: Vec<SegmentStart>,
}

impl SegmentBuilder {
    /// Start building with an initial segment opening at line 0.
    pub(crate) fn new(kind: ChunkKind, label: impl Into<String>) -> Self {
        Self {
            starts: vec![SegmentStart {
                line_index: 0,
                kind,
                label: label.into(),
            }],
        }
    }

    /// Kind of the currently accumulating segment.
    pub(crate) fn current_kind(&self) -> ChunkKind {
        // The builder is constructed with one segment and never shrinks.
        self.starts[self.starts.len() - 1].kind
    }

    /// Open a new segment at `line_index`. Opening at the same index as the
    /// current segment replaces it (the previous opener matched nothing).
    pub(crate) fn open(
        &mut self,
        line_index: usize,
        kind: ChunkKind,
        label: impl Into<String>,
    ) -> Result<()> {
        let current = self.starts[self.starts.len() - 1].line_index;

        if line_index < current {
            return Err(ChunkerError::scan(format!(
                "segment opened at line {} behind cursor {}",
                line_index + 1,
                current + 1
            )));
        }

        let start = SegmentStart {
            line_index,
            kind,
            label: label.into(),
        };

        if line_index == current {
            let last = self.starts.len() - 1;
            self.starts[last] = start;
        } else {
            self.starts.push(start);
        }

        Ok(())
    }

    /// Materialize chunks over the scanned lines. Zero-length trailing
    /// segments (opened past the last line) are dropped.
    pub(crate) fn build(self, lines: &[&str]) -> Vec<Chunk> {
        let mut chunks = Vec::with_capacity(self.starts.len());

        for (i, start) in self.starts.iter().enumerate() {
            let begin = start.line_index;
            let end = self
                .starts
                .get(i + 1)
                .map_or(lines.len(), |next| next.line_index);

            if begin >= end || begin >= lines.len() {
                continue;
            }

            chunks.push(Chunk::new(
                lines[begin..end].join("\n"),
                begin + 1,
                end,
                start.kind,
                start.label.clone(),
            ));
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_contiguous_chunks() {
        let lines = vec!["a", "b", "c", "d", "e"];
        let mut builder = SegmentBuilder::new(ChunkKind::Other, "global");
        builder.open(2, ChunkKind::Method, "method(A.f)").unwrap();
        builder.open(4, ChunkKind::Other, "trailer").unwrap();

        let chunks = builder.build(&lines);
        assert_eq!(chunks.len(), 3);
        assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 2));
        assert_eq!((chunks[1].start_line, chunks[1].end_line), (3, 4));
        assert_eq!((chunks[2].start_line, chunks[2].end_line), (5, 5));
        assert_eq!(chunks[1].text, "c\nd");
    }

    #[test]
    fn reopening_at_same_index_replaces() {
        let lines = vec!["a", "b"];
        let mut builder = SegmentBuilder::new(ChunkKind::Other, "global");
        builder.open(0, ChunkKind::Class, "class(A)").unwrap();

        let chunks = builder.build(&lines);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, ChunkKind::Class);
    }

    #[test]
    fn opening_behind_cursor_is_an_error() {
        let mut builder = SegmentBuilder::new(ChunkKind::Other, "global");
        builder.open(3, ChunkKind::Method, "m").unwrap();
        assert!(builder.open(1, ChunkKind::Method, "n").is_err());
    }

    #[test]
    fn trailing_empty_segment_is_dropped() {
        let lines = vec!["a", "b"];
        let mut builder = SegmentBuilder::new(ChunkKind::Other, "global");
        builder.open(2, ChunkKind::Other, "past-eof").unwrap();

        let chunks = builder.build(&lines);
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 2));
    }
}
