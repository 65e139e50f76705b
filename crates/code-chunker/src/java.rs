//! Boundary scanner for Java-like source.
//!
//! Recognizes class/interface/enum openers, member declarations (including
//! annotated, multi-modifier, and generic forms, plus constructors), and
//! leading package/import runs. Closings are driven by brace depth returning
//! to the level recorded at the opening, with a bounded lookahead deciding
//! whether a closing brace ends the chunk.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::scan::{peek_next_substantive, BraceTracker, NextSubstantive};
use crate::segment::SegmentBuilder;
use crate::types::{Chunk, ChunkKind};

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:package|import)\s+").expect("import pattern"));

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected)\s+)?(?:(?:static|final|abstract)\s+)*(?:class|interface|enum)\s+(\w+)",
    )
    .expect("class pattern")
});

static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:@\w+\s*(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|static|final|abstract|synchronized|native|transient|volatile)\s+)*(?:<[^>]+>\s+)?([\w.<>\[\],\s]+?)\s+(\w+)\s*\(",
    )
    .expect("method pattern")
});

/// Statement keywords the loose method pattern would otherwise take for a
/// return type or member name.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "catch", "try", "return", "throw", "new",
];

fn method_name(line: &str) -> Option<&str> {
    let caps = METHOD_RE.captures(line)?;
    let type_run = caps.get(1)?.as_str();
    let first_word = type_run.split_whitespace().next().unwrap_or_default();
    let name = caps.get(2)?.as_str();
    if STATEMENT_KEYWORDS.contains(&first_word) || STATEMENT_KEYWORDS.contains(&name) {
        return None;
    }
    Some(name)
}

fn constructor_pattern(class_name: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"^\s*(?:@\w+\s+)*(?:(?:public|private|protected|static|final|abstract|synchronized)\s+)*{}\s*\(",
        regex::escape(class_name)
    ))?)
}

fn is_member_boundary(line: &str, constructor: Option<&Regex>) -> bool {
    if method_name(line).is_some() || CLASS_RE.is_match(line) {
        return true;
    }
    constructor.is_some_and(|re| re.is_match(line))
}

pub(crate) fn chunk_java(lines: &[&str], config: &ChunkerConfig) -> Result<Vec<Chunk>> {
    let mut tracker = BraceTracker::new();
    let mut segments = SegmentBuilder::new(ChunkKind::Other, "global");

    let mut in_class = false;
    let mut in_method = false;
    let mut in_annotation = false;
    let mut class_name = String::new();
    let mut class_open_depth = 0usize;
    let mut method_open_depth = 0usize;
    let mut constructor_re: Option<Regex> = None;

    for (i, &line) in lines.iter().enumerate() {
        let stripped = line.trim();
        let depth_before = tracker.depth();
        tracker.feed_line(line)?;
        let depth_after = tracker.depth();

        let commented = tracker.in_block_comment() || stripped.starts_with("//");

        // A multi-line annotation suppresses boundary detection until its
        // closing parenthesis.
        if !commented {
            if stripped.starts_with('@') && !stripped.ends_with(')') {
                in_annotation = true;
            }
            if in_annotation && line.contains(')') {
                in_annotation = false;
            }
        }

        if !commented && !in_class && IMPORT_RE.is_match(line) {
            if segments.current_kind() != ChunkKind::Imports {
                segments.open(i, ChunkKind::Imports, "imports")?;
            }
            continue;
        }

        if !commented && !in_annotation && !in_class {
            if let Some(caps) = CLASS_RE.captures(line) {
                class_name = caps[1].to_string();
                constructor_re = Some(constructor_pattern(&class_name)?);
                class_open_depth = depth_before;
                in_class = true;
                segments.open(i, ChunkKind::Class, format!("class({class_name})"))?;
                continue;
            }
        }

        // Members are only recognized directly inside the class body, which
        // keeps statement-level false positives out.
        if in_class
            && !in_method
            && !commented
            && !in_annotation
            && depth_before == class_open_depth + 1
        {
            let name = method_name(line).map(str::to_string).or_else(|| {
                constructor_re
                    .as_ref()
                    .filter(|re| re.is_match(line))
                    .map(|_| class_name.clone())
            });

            if let Some(name) = name {
                segments.open(i, ChunkKind::Method, format!("method({class_name}.{name})"))?;
                method_open_depth = depth_before;
                // Abstract/interface members have no body to track, and a
                // body opened and closed on the declaration line is already
                // complete.
                let body_closed_inline = line.contains('{') && depth_after <= depth_before;
                in_method = !stripped.ends_with(';') && !body_closed_inline;
                continue;
            }
        }

        if in_method && line.contains('}') && depth_after <= method_open_depth {
            if depth_after <= class_open_depth {
                in_method = false;
                in_class = false;
                segments.open(i + 1, ChunkKind::Other, "global")?;
                continue;
            }

            let next = peek_next_substantive(lines, i + 1, config.lookahead_lines, |next_line| {
                is_member_boundary(next_line, constructor_re.as_ref())
            });
            match next {
                NextSubstantive::Declaration(_) | NextSubstantive::None => {
                    in_method = false;
                    segments.open(i + 1, ChunkKind::Other, format!("class-body({class_name})"))?;
                }
                // The closing brace does not end the member; keep absorbing.
                NextSubstantive::Code(_) => {}
            }
            continue;
        }

        if in_class && !in_method && line.contains('}') && depth_after <= class_open_depth {
            in_class = false;
            segments.open(i + 1, ChunkKind::Other, "global")?;
        }
    }

    Ok(segments.build(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(text: &str) -> Vec<Chunk> {
        let lines: Vec<&str> = text.lines().collect();
        chunk_java(&lines, &ChunkerConfig::default()).unwrap()
    }

    #[test]
    fn splits_class_and_methods() {
        let text = "\
package com.example;
import java.util.List;

public class Account {
    private int balance;

    public void deposit(int amount) {
        balance += amount;
    }

    public int balance() {
        return balance;
    }
}";
        let chunks = chunk(text);
        let labels: Vec<&str> = chunks.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "imports",
                "class(Account)",
                "method(Account.deposit)",
                "class-body(Account)",
                "method(Account.balance)",
                "class-body(Account)",
            ]
        );
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks.last().unwrap().end_line, 14);
    }

    #[test]
    fn recognizes_constructors() {
        let text = "\
public class Widget {
    private final String name;

    public Widget(String name) {
        this.name = name;
    }

    void render() {
    }
}";
        let chunks = chunk(text);
        assert!(chunks
            .iter()
            .any(|c| c.label == "method(Widget.Widget)" && c.kind == ChunkKind::Method));
        assert!(chunks.iter().any(|c| c.label == "method(Widget.render)"));
    }

    #[test]
    fn annotated_method_is_detected_after_annotation_lines() {
        let text = "\
public class Api {
    @RequestMapping(
        path = \"/health\"
    )
    public String health() {
        return \"ok\";
    }
}";
        let chunks = chunk(text);
        assert!(chunks.iter().any(|c| c.label == "method(Api.health)"));
    }

    #[test]
    fn statement_keywords_are_not_members() {
        assert!(method_name("        } else if (x > 0) {").is_none());
        assert!(method_name("        return compute(x);").is_none());
        assert!(method_name("    public void run() {").is_some());
    }

    #[test]
    fn interface_members_do_not_track_bodies() {
        let text = "\
public interface Store {
    void put(String key);
    String get(String key);
}";
        let chunks = chunk(text);
        let methods: Vec<&str> = chunks
            .iter()
            .filter(|c| c.kind == ChunkKind::Method)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(methods, vec!["method(Store.put)", "method(Store.get)"]);
    }

    #[test]
    fn chunks_are_contiguous() {
        let text = "\
import java.io.File;

class Loader {
    File open(String path) {
        return new File(path);
    }
}

class Saver {
}";
        let chunks = chunk(text);
        let mut expected = 1;
        for chunk in &chunks {
            assert_eq!(chunk.start_line, expected);
            expected = chunk.end_line + 1;
        }
        assert_eq!(expected, text.lines().count() + 1);
    }
}
