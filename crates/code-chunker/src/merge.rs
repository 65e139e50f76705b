//! Trivial-chunk folding.
//!
//! The boundary scanners happily emit one-line residue between declarations
//! (a blank run after a method, a bare closing brace, a comment block). The
//! post-pass folds such chunks into a neighbor: preferably prepended to the
//! *following* declaration-bearing chunk, otherwise accumulated into a
//! running "other" chunk. Declaration chunks themselves are never absorbed,
//! however small.

use crate::types::{Chunk, ChunkKind};

/// Comment syntax used by the comment-only check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentStyle {
    /// `//`, `/* ... */` and `*` continuation lines.
    CLike,
    /// `<!-- ... -->`.
    Markup,
}

pub(crate) fn merge_trivial_chunks(
    chunks: Vec<Chunk>,
    min_lines: usize,
    style: CommentStyle,
) -> Vec<Chunk> {
    let mut out: Vec<Chunk> = Vec::with_capacity(chunks.len());
    let mut pending: Option<Chunk> = None;
    let mut iter = chunks.into_iter().peekable();

    while let Some(chunk) = iter.next() {
        let trivial = !chunk.kind.is_declaration()
            && (chunk.line_count() < min_lines || is_comment_only(&chunk, style));

        if trivial {
            if let Some(next) = iter.peek_mut() {
                if next.kind.is_declaration() && next.start_line == chunk.end_line + 1 {
                    // Fold forward: the trivia (javadoc, annotations, blank
                    // run) belongs with the declaration it precedes.
                    let mut text = chunk.text;
                    if !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&next.text);
                    next.text = text;
                    next.start_line = chunk.start_line;
                    continue;
                }
            }

            pending = Some(match pending.take() {
                Some(mut acc) => {
                    if !acc.text.ends_with('\n') {
                        acc.text.push('\n');
                    }
                    acc.text.push_str(&chunk.text);
                    acc.end_line = chunk.end_line;
                    if acc.label != chunk.label {
                        acc.label = format!("{}+{}", acc.label, chunk.label);
                    }
                    acc.kind = ChunkKind::Other;
                    acc
                }
                None => chunk,
            });
            continue;
        }

        if let Some(acc) = pending.take() {
            out.push(acc);
        }
        out.push(chunk);
    }

    if let Some(acc) = pending {
        out.push(acc);
    }

    out
}

fn is_comment_only(chunk: &Chunk, style: CommentStyle) -> bool {
    if chunk.kind == ChunkKind::Other && chunk.label == "comment" {
        return true;
    }

    chunk.text.lines().all(|line| {
        let stripped = line.trim();
        if stripped.is_empty() {
            return true;
        }
        match style {
            CommentStyle::CLike => {
                stripped.starts_with("//")
                    || stripped.starts_with("/*")
                    || stripped.starts_with('*')
            }
            CommentStyle::Markup => {
                stripped.starts_with("<!--") || stripped.ends_with("-->")
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(start: usize, end: usize, kind: ChunkKind, label: &str, text: &str) -> Chunk {
        Chunk::new(text, start, end, kind, label)
    }

    #[test]
    fn comment_block_folds_into_following_method() {
        let chunks = vec![
            chunk(1, 2, ChunkKind::Other, "class-body(A)", "// helper\n// docs"),
            chunk(3, 30, ChunkKind::Method, "method(A.run)", "void run() {\n}"),
        ];
        let merged = merge_trivial_chunks(chunks, 20, CommentStyle::CLike);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start_line, 1);
        assert_eq!(merged[0].end_line, 30);
        assert_eq!(merged[0].kind, ChunkKind::Method);
        assert!(merged[0].text.starts_with("// helper"));
    }

    #[test]
    fn leftovers_accumulate_into_one_other_chunk() {
        let chunks = vec![
            chunk(1, 25, ChunkKind::Method, "method(A.a)", "a"),
            chunk(26, 26, ChunkKind::Other, "class-body(A)", "x();"),
            chunk(27, 27, ChunkKind::Other, "global", "}"),
        ];
        let merged = merge_trivial_chunks(chunks, 20, CommentStyle::CLike);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].start_line, 26);
        assert_eq!(merged[1].end_line, 27);
        assert_eq!(merged[1].kind, ChunkKind::Other);
        assert_eq!(merged[1].label, "class-body(A)+global");
    }

    #[test]
    fn small_declarations_are_never_absorbed() {
        let chunks = vec![
            chunk(1, 1, ChunkKind::Class, "class(A)", "class A {"),
            chunk(2, 3, ChunkKind::Method, "method(A.f)", "void f() {\n}"),
        ];
        let merged = merge_trivial_chunks(chunks, 20, CommentStyle::CLike);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn substantive_chunks_pass_through() {
        let text = vec!["line"; 25].join("\n");
        let chunks = vec![chunk(1, 25, ChunkKind::Other, "global", &text)];
        let merged = merge_trivial_chunks(chunks, 20, CommentStyle::CLike);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label, "global");
    }

    #[test]
    fn fold_target_must_be_adjacent() {
        let chunks = vec![
            chunk(1, 1, ChunkKind::Other, "global", "x"),
            chunk(5, 30, ChunkKind::Method, "method(A.f)", "void f() {"),
        ];
        let merged = merge_trivial_chunks(chunks, 20, CommentStyle::CLike);
        // Non-contiguous input: fold is refused, both chunks survive.
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].start_line, 5);
    }

    #[test]
    fn markup_comment_only_detection() {
        let trivia = chunk(1, 1, ChunkKind::Other, "filler", "<!-- x -->");
        assert!(is_comment_only(&trivia, CommentStyle::Markup));
        let labeled = chunk(1, 8, ChunkKind::Other, "comment", "anything");
        assert!(is_comment_only(&labeled, CommentStyle::Markup));
        let element = chunk(1, 1, ChunkKind::Other, "other", "<x>1</x>");
        assert!(!is_comment_only(&element, CommentStyle::Markup));
    }
}
