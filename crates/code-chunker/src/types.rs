use serde::{Deserialize, Serialize};

/// A line-range segment of a file with a semantic label.
///
/// Lines are 1-based and inclusive, always in *original* file coordinates.
/// For any file the produced chunks cover every line exactly once; chunks
/// are never mutated after the chunker returns them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// The segment's text, newline-joined.
    pub text: String,

    /// First line of the segment (1-based).
    pub start_line: usize,

    /// Last line of the segment (1-based, inclusive).
    pub end_line: usize,

    /// Construct kind the segment is aligned to.
    pub kind: ChunkKind,

    /// Human-readable label, e.g. `method(Account.withdraw)` or a composite
    /// like `imports+other` after trivial-chunk folding.
    pub label: String,
}

impl Chunk {
    pub fn new(
        text: impl Into<String>,
        start_line: usize,
        end_line: usize,
        kind: ChunkKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            start_line,
            end_line,
            kind,
            label: label.into(),
        }
    }

    /// Number of lines spanned by this chunk.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check whether a file-global line falls inside this chunk.
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Construct kind a chunk is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkKind {
    /// package/import/namespace/use run.
    Imports,
    /// Class, interface, or enum opening segment.
    Class,
    /// Method or constructor inside a class.
    Method,
    /// Free-standing function.
    Function,
    /// Major markup element group (e.g. a `<dependencies>` section).
    Element,
    /// Fixed-size window for unrecognized languages.
    FixedWindow,
    /// Residual code between recognized constructs.
    Other,
    /// Whole-file fallback when the scan could not make sense of the input.
    Unparsed,
}

impl ChunkKind {
    /// Declaration-bearing kinds are preferred fold targets during the merge
    /// post-pass and are themselves never absorbed.
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Method | Self::Function | Self::Element
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Class => "class",
            Self::Method => "method",
            Self::Function => "function",
            Self::Element => "element",
            Self::FixedWindow => "fixed-window",
            Self::Other => "other",
            Self::Unparsed => "unparsed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_is_inclusive() {
        let chunk = Chunk::new("a\nb\nc", 10, 12, ChunkKind::Other, "other");
        assert_eq!(chunk.line_count(), 3);
    }

    #[test]
    fn contains_line_checks_bounds() {
        let chunk = Chunk::new("x", 5, 8, ChunkKind::Method, "method(A.b)");
        assert!(chunk.contains_line(5));
        assert!(chunk.contains_line(8));
        assert!(!chunk.contains_line(4));
        assert!(!chunk.contains_line(9));
    }

    #[test]
    fn declaration_kinds() {
        assert!(ChunkKind::Class.is_declaration());
        assert!(ChunkKind::Method.is_declaration());
        assert!(ChunkKind::Function.is_declaration());
        assert!(ChunkKind::Element.is_declaration());
        assert!(!ChunkKind::Imports.is_declaration());
        assert!(!ChunkKind::Other.is_declaration());
        assert!(!ChunkKind::Unparsed.is_declaration());
    }
}
