//! Line-level structure scanning shared by the brace-structured scanners.
//!
//! This is a heuristic text scan, not a tokenizer: string literals are
//! detected by counting unescaped quotes before a position, and block
//! comments are tracked at line granularity. That is enough to keep brace
//! depth honest on real-world source; anything that confuses it surfaces as
//! a scan error and the file falls back to a single chunk.

use crate::error::{ChunkerError, Result};

/// Tracks brace depth across lines, ignoring braces inside string literals
/// and active block comments.
#[derive(Debug, Default)]
pub(crate) struct BraceTracker {
    depth: usize,
    in_block_comment: bool,
}

impl BraceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Depth after the most recently fed line.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the most recently fed line left a block comment open.
    pub(crate) fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Feed one line, updating comment state and brace depth.
    ///
    /// Depth underflow (a closing brace with no opener in sight) is reported
    /// as an error rather than papered over; the caller falls back to the
    /// whole-file chunk.
    pub(crate) fn feed_line(&mut self, line: &str) -> Result<()> {
        let stripped = line.trim_start();

        // Line granularity on purpose: a line that only opens a comment has
        // its braces ignored; a line that closes one is scanned normally.
        if line.contains("/*") && !line.contains("*/") {
            self.in_block_comment = true;
        }
        if line.contains("*/") {
            self.in_block_comment = false;
        }

        if self.in_block_comment || stripped.starts_with("//") {
            return Ok(());
        }

        for (pos, ch) in line.char_indices() {
            match ch {
                '{' if !is_in_string(line, pos) => self.depth += 1,
                '}' if !is_in_string(line, pos) => {
                    self.depth = self
                        .depth
                        .checked_sub(1)
                        .ok_or_else(|| ChunkerError::scan("brace depth underflow"))?;
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Whether a byte position on a line falls inside a string literal, judged
/// by the parity of unescaped quote characters before it.
pub(crate) fn is_in_string(line: &str, pos: usize) -> bool {
    let mut single = 0usize;
    let mut double = 0usize;
    let mut escaped = false;

    for ch in line[..pos].chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\'' => single += 1,
            '"' => double += 1,
            _ => {}
        }
    }

    single % 2 == 1 || double % 2 == 1
}

/// Lines skipped when looking ahead for the next substantive line.
pub(crate) fn is_blank_or_comment(line: &str) -> bool {
    let stripped = line.trim();
    stripped.is_empty()
        || stripped.starts_with("//")
        || stripped.starts_with("/*")
        || stripped.starts_with('*')
}

/// What the bounded lookahead found past a closing brace.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NextSubstantive {
    /// A new declaration opens at this line index; close the current chunk.
    Declaration(usize),
    /// Ordinary code continues at this line index; the closing brace does
    /// not end the chunk.
    Code(usize),
    /// Nothing substantive within the window.
    None,
}

/// Inspect up to `window` following lines, skipping blanks and comments.
/// Bare closers and annotations neither confirm nor veto a boundary.
pub(crate) fn peek_next_substantive(
    lines: &[&str],
    from: usize,
    window: usize,
    is_declaration: impl Fn(&str) -> bool,
) -> NextSubstantive {
    let end = (from + window).min(lines.len());

    for (j, line) in lines.iter().enumerate().take(end).skip(from) {
        if is_blank_or_comment(line) {
            continue;
        }

        if is_declaration(line) {
            return NextSubstantive::Declaration(j);
        }

        let stripped = line.trim_start();
        if stripped.starts_with('}') || stripped.starts_with('@') {
            continue;
        }

        return NextSubstantive::Code(j);
    }

    NextSubstantive::None
}
