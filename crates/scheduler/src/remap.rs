//! Validation and remapping of raw findings into file coordinates.

use sweep_code_chunker::Chunk;
use sweep_protocol::{Finding, RawFinding};

/// Convert the collaborator's chunk-local findings into publishable
/// file-global findings.
///
/// Per finding: the "none" sentinel and findings with an empty category are
/// discarded; chunk-local lines outside `1..=chunk_line_count` are dropped
/// with a warning; survivors are remapped via
/// `file_global = chunk.start_line + local - 1` and validated against the
/// file length. A finding left without a single valid line is dropped.
pub(crate) fn remap_findings(
    raw: Vec<RawFinding>,
    chunk: &Chunk,
    file_path: &str,
    file_line_count: usize,
) -> Vec<Finding> {
    let chunk_lines = chunk.line_count();
    let mut findings = Vec::with_capacity(raw.len());

    for finding in raw {
        if finding.is_clean_marker() {
            log::debug!("{file_path}: dropping clean-marker finding");
            continue;
        }
        if finding.category.trim().is_empty() {
            log::warn!("{file_path}: dropping finding with empty category");
            continue;
        }

        let mut lines = Vec::with_capacity(finding.lines.len());
        for local in finding.lines {
            if local == 0 || local as usize > chunk_lines {
                log::warn!(
                    "{file_path}: chunk-local line {local} outside 1..={chunk_lines}, dropped"
                );
                continue;
            }

            let global = chunk.start_line + local as usize - 1;
            if global > file_line_count {
                log::warn!(
                    "{file_path}: remapped line {global} beyond file length {file_line_count}, dropped"
                );
                continue;
            }
            lines.push(global as u32);
        }

        if lines.is_empty() {
            log::warn!(
                "{file_path}: finding \"{}\" has no valid line numbers, dropped",
                finding.category
            );
            continue;
        }

        findings.push(Finding {
            file_path: file_path.to_string(),
            lines,
            severity: finding.severity,
            category: finding.category,
            description: finding.description,
            risk_snippet: finding.risk_snippet,
            payload_example: finding.payload_example,
            remediation: finding.remediation,
        });
    }

    findings
}
