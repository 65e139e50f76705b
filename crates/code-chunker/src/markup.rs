//! Boundary scanner for markup-like input (XML, Maven POM).
//!
//! Comments may open and close anywhere, including mid-line and across
//! lines, so the scan first builds a comment-free view of the document while
//! keeping a mapping back to original line indices. Element boundaries are
//! found on the filtered view; the chunks that come out carry original line
//! numbers and original text (comments included). Runs of lines not claimed
//! by any recognized element are emitted as filler so the file stays fully
//! covered.

use crate::error::{ChunkerError, Result};
use crate::types::{Chunk, ChunkKind};

/// Primary child groups of the root element, chunked as units.
const MAIN_SECTIONS: &[&str] = &[
    "modules",
    "properties",
    "dependencies",
    "dependencyManagement",
    "build",
    "profiles",
    "parent",
    "distributionManagement",
];

/// Repeated item element chunked individually when it appears outside a
/// claimed section.
const ITEM_TAG: &str = "dependency";

const ROOT_TAG: &str = "project";

struct FilteredLine {
    text: String,
    original: usize,
}

pub(crate) fn chunk_markup(lines: &[&str]) -> Result<Vec<Chunk>> {
    let filtered = filter_comments(lines);

    let root_start = filtered
        .iter()
        .position(|line| count_opens(&line.text, ROOT_TAG) > 0);
    let root_end = filtered
        .iter()
        .rposition(|line| count_closes(&line.text, ROOT_TAG) > 0);

    let (root_start, root_end) = match (root_start, root_end) {
        (Some(start), Some(end)) if start <= end => (start, end),
        // No recognizable root element: the whole document is one chunk.
        _ => {
            return Ok(vec![Chunk::new(
                lines.join("\n"),
                1,
                lines.len(),
                ChunkKind::Element,
                "document",
            )])
        }
    };

    let mut claimed = vec![false; filtered.len()];
    let mut candidates: Vec<(usize, usize, String)> = Vec::new();

    if let Some(decl) = filtered
        .iter()
        .position(|line| line.text.trim_start().starts_with("<?xml"))
    {
        claimed[decl] = true;
        candidates.push((decl, decl, "xml-declaration".to_string()));
    }

    for section in MAIN_SECTIONS {
        if let Some((start, end)) =
            find_balanced(&filtered, root_start, root_end, section, &claimed)
        {
            claim(&mut claimed, start, end);
            candidates.push((start, end, format!("{section} section")));
        }
    }

    // Repeated items left outside the claimed sections.
    let mut index = root_start;
    while index <= root_end {
        if !claimed[index] && count_opens(&filtered[index].text, ITEM_TAG) > 0 {
            if let Some(end) = balance_from(&filtered, index, root_end, ITEM_TAG) {
                claim(&mut claimed, index, end);
                candidates.push((index, end, ITEM_TAG.to_string()));
                index = end + 1;
                continue;
            }
        }
        index += 1;
    }

    // Re-express candidates in original coordinates and fill the gaps.
    let mut ranges: Vec<(usize, usize, String)> = candidates
        .into_iter()
        .map(|(start, end, label)| (filtered[start].original, filtered[end].original, label))
        .collect();
    ranges.sort_by_key(|range| range.0);

    let mut has_content = vec![false; lines.len()];
    for line in &filtered {
        has_content[line.original] = true;
    }

    let mut chunks = Vec::new();
    let mut cursor = 0usize;

    for (start, end, label) in ranges {
        if start < cursor {
            // Nested inside an already emitted range (e.g. a dependencies
            // group claimed through dependencyManagement); the outer chunk
            // already carries these lines.
            continue;
        }
        if end < start || end >= lines.len() {
            return Err(ChunkerError::coverage(format!(
                "element range {}..{} outside document",
                start + 1,
                end + 1
            )));
        }

        if start > cursor {
            chunks.push(filler_chunk(lines, cursor, start - 1, &has_content));
        }
        chunks.push(Chunk::new(
            lines[start..=end].join("\n"),
            start + 1,
            end + 1,
            ChunkKind::Element,
            label,
        ));
        cursor = end + 1;
    }

    if cursor < lines.len() {
        chunks.push(filler_chunk(lines, cursor, lines.len() - 1, &has_content));
    }

    Ok(chunks)
}

fn filler_chunk(lines: &[&str], start: usize, end: usize, has_content: &[bool]) -> Chunk {
    let label = if (start..=end).any(|i| has_content[i]) {
        "other"
    } else {
        "comment"
    };
    Chunk::new(
        lines[start..=end].join("\n"),
        start + 1,
        end + 1,
        ChunkKind::Other,
        label,
    )
}

/// Strip comments, keeping a map from surviving text back to original line
/// indices. Lines left empty after stripping are dropped from the view.
fn filter_comments(lines: &[&str]) -> Vec<FilteredLine> {
    let mut filtered = Vec::new();
    let mut in_comment = false;

    for (i, &line) in lines.iter().enumerate() {
        let mut kept = String::new();
        let mut remaining = line;

        loop {
            if in_comment {
                if let Some(pos) = remaining.find("-->") {
                    remaining = &remaining[pos + 3..];
                    in_comment = false;
                } else {
                    break;
                }
            } else if let Some(pos) = remaining.find("<!--") {
                kept.push_str(&remaining[..pos]);
                remaining = &remaining[pos + 4..];
                in_comment = true;
            } else {
                kept.push_str(remaining);
                break;
            }
        }

        let kept = kept.trim();
        if !kept.is_empty() {
            filtered.push(FilteredLine {
                text: kept.to_string(),
                original: i,
            });
        }
    }

    filtered
}

/// Count `<tag` openers on a line, requiring a non-name character after the
/// tag so `<dependencies>` does not count as `<dependency`.
fn count_opens(line: &str, tag: &str) -> usize {
    let needle = format!("<{tag}");
    count_with_boundary(line, &needle, tag.len() + 1)
}

fn count_closes(line: &str, tag: &str) -> usize {
    line.matches(&format!("</{tag}>")).count()
}

fn count_with_boundary(line: &str, needle: &str, needle_len: usize) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = line[from..].find(needle) {
        let after = from + pos + needle_len;
        let boundary = line[after..]
            .chars()
            .next()
            .map_or(true, |ch| !ch.is_alphanumeric() && ch != '_' && ch != '-');
        if boundary {
            count += 1;
        }
        from = after;
    }
    count
}

/// Find the first unclaimed, depth-balanced occurrence of `tag` within the
/// root element, in filtered coordinates.
fn find_balanced(
    filtered: &[FilteredLine],
    root_start: usize,
    root_end: usize,
    tag: &str,
    claimed: &[bool],
) -> Option<(usize, usize)> {
    for start in root_start..=root_end {
        if claimed[start] || count_opens(&filtered[start].text, tag) == 0 {
            continue;
        }
        return balance_from(filtered, start, root_end, tag).map(|end| (start, end));
    }
    None
}

/// Track open/close counts for `tag` from `start` until depth returns to
/// zero. `None` when the element never balances within the root.
fn balance_from(
    filtered: &[FilteredLine],
    start: usize,
    root_end: usize,
    tag: &str,
) -> Option<usize> {
    let mut depth = 0isize;
    for (index, line) in filtered
        .iter()
        .enumerate()
        .take(root_end + 1)
        .skip(start)
    {
        depth += count_opens(&line.text, tag) as isize;
        depth -= count_closes(&line.text, tag) as isize;
        if depth <= 0 {
            return Some(index);
        }
    }
    None
}

fn claim(claimed: &mut [bool], start: usize, end: usize) {
    for flag in &mut claimed[start..=end] {
        *flag = true;
    }
}
