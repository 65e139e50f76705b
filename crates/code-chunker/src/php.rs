//! Boundary scanner for PHP-like source.
//!
//! Same skeleton as the Java scanner, with `function` declarations carrying
//! the structure: namespace/use runs, class openers, class methods, and
//! free-standing functions. Anonymous closures carry no name and are left
//! inside whatever chunk they appear in.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::scan::{peek_next_substantive, BraceTracker, NextSubstantive};
use crate::segment::SegmentBuilder;
use crate::types::{Chunk, ChunkKind};

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:namespace|use)\s+").expect("import pattern"));

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:abstract\s+|final\s+)?class\s+(\w+)").expect("class pattern"));

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:public|private|protected|static)\s+)*function\s+(\w+)")
        .expect("function pattern")
});

fn is_function_boundary(line: &str) -> bool {
    FUNCTION_RE.is_match(line)
}

fn is_class_or_function_boundary(line: &str) -> bool {
    CLASS_RE.is_match(line) || FUNCTION_RE.is_match(line)
}

pub(crate) fn chunk_php(lines: &[&str], config: &ChunkerConfig) -> Result<Vec<Chunk>> {
    let mut tracker = BraceTracker::new();
    let mut segments = SegmentBuilder::new(ChunkKind::Other, "global");

    let mut in_class = false;
    let mut in_method = false;
    let mut in_function = false;
    let mut class_name = String::new();
    let mut class_open_depth = 0usize;
    let mut member_open_depth = 0usize;

    for (i, &line) in lines.iter().enumerate() {
        let stripped = line.trim();
        let depth_before = tracker.depth();
        tracker.feed_line(line)?;
        let depth_after = tracker.depth();

        let commented = tracker.in_block_comment() || stripped.starts_with("//");

        if !commented
            && !in_class
            && !in_method
            && !in_function
            && IMPORT_RE.is_match(line)
        {
            if segments.current_kind() != ChunkKind::Imports {
                segments.open(i, ChunkKind::Imports, "imports")?;
            }
            continue;
        }

        if !commented && !in_class {
            if let Some(caps) = CLASS_RE.captures(line) {
                class_name = caps[1].to_string();
                class_open_depth = depth_before;
                in_class = true;
                segments.open(i, ChunkKind::Class, format!("class({class_name})"))?;
                continue;
            }
        }

        if !commented && !in_method && !in_function {
            if let Some(caps) = FUNCTION_RE.captures(line) {
                let name = caps[1].to_string();
                member_open_depth = depth_before;
                // Abstract signatures carry no body; a one-line body is
                // already complete on the declaration line.
                let body_closed_inline = line.contains('{') && depth_after <= depth_before;
                let tracks_body = !stripped.ends_with(';') && !body_closed_inline;
                if in_class {
                    segments.open(i, ChunkKind::Method, format!("method({class_name}.{name})"))?;
                    in_method = tracks_body;
                } else {
                    segments.open(i, ChunkKind::Function, format!("function({name})"))?;
                    in_function = tracks_body;
                }
                continue;
            }
        }

        if in_method && line.contains('}') && depth_after <= member_open_depth {
            if depth_after <= class_open_depth {
                in_method = false;
                in_class = false;
                segments.open(i + 1, ChunkKind::Other, "global")?;
                continue;
            }

            let next =
                peek_next_substantive(lines, i + 1, config.lookahead_lines, is_function_boundary);
            match next {
                NextSubstantive::Declaration(_) | NextSubstantive::None => {
                    in_method = false;
                    segments.open(i + 1, ChunkKind::Other, format!("class-body({class_name})"))?;
                }
                NextSubstantive::Code(_) => {}
            }
            continue;
        }

        if in_function && line.contains('}') && depth_after <= member_open_depth {
            let next = peek_next_substantive(
                lines,
                i + 1,
                config.lookahead_lines,
                is_class_or_function_boundary,
            );
            match next {
                NextSubstantive::Declaration(_) | NextSubstantive::None => {
                    in_function = false;
                    segments.open(i + 1, ChunkKind::Other, "global")?;
                }
                NextSubstantive::Code(_) => {}
            }
            continue;
        }

        if in_class && !in_method && line.contains('}') && depth_after <= class_open_depth {
            let next = peek_next_substantive(
                lines,
                i + 1,
                config.lookahead_lines,
                is_class_or_function_boundary,
            );
            match next {
                NextSubstantive::Declaration(_) | NextSubstantive::None => {
                    in_class = false;
                    segments.open(i + 1, ChunkKind::Other, "global")?;
                }
                // Stray statements after the class closer are absorbed.
                NextSubstantive::Code(_) => {}
            }
        }
    }

    Ok(segments.build(lines))
}
