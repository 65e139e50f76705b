//! Decoding of analysis replies into [`RawFinding`]s.
//!
//! Model output is messy: the JSON payload may arrive inside a Markdown
//! fence, keys may carry stray whitespace, the line-number field may be a
//! scalar or a list, and a "clean" reply is signalled by the sentinel
//! category "none". This module normalizes all of that; collaborator
//! implementations use it to classify a reply as findings or as a
//! [`crate::FailureKind::Malformed`] failure.

use serde_json::Value;
use thiserror::Error;

use crate::{RawFinding, Severity};

/// Errors produced while decoding an analysis reply.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("finding is not a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown severity: {0:?}")]
    UnknownSeverity(String),
}

/// Decode a reply body into raw findings.
///
/// Sentinel "none" findings are kept here; filtering them is the caller's
/// decision point, not the decoder's.
pub fn decode_findings(body: &str) -> Result<Vec<RawFinding>, ResponseError> {
    let payload = extract_json_payload(body);
    let value: Value = serde_json::from_str(payload.trim())?;

    let items: Vec<Value> = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return Err(ResponseError::NotAnObject),
    };

    items.iter().map(decode_one).collect()
}

/// Extract the contents of a ```json fence when present, otherwise return
/// the body unchanged.
fn extract_json_payload(body: &str) -> &str {
    if let Some(start) = body.find("```json") {
        let after = &body[start + "```json".len()..];
        if let Some(end) = after.rfind("```") {
            return &after[..end];
        }
        return after;
    }
    body
}

fn decode_one(value: &Value) -> Result<RawFinding, ResponseError> {
    let object = value.as_object().ok_or(ResponseError::NotAnObject)?;

    // Keys sometimes arrive padded with whitespace; normalize before lookup.
    let field = |name: &str| -> Option<&Value> {
        object
            .iter()
            .find(|(key, _)| key.trim() == name)
            .map(|(_, v)| v)
    };

    let lines = decode_lines(field("lines").ok_or(ResponseError::MissingField("lines"))?);

    let severity_label = string_field(field("severity"))
        .ok_or(ResponseError::MissingField("severity"))?;
    let severity = Severity::parse(&severity_label)
        .ok_or_else(|| ResponseError::UnknownSeverity(severity_label.clone()))?;

    let category =
        string_field(field("category")).ok_or(ResponseError::MissingField("category"))?;
    let description =
        string_field(field("description")).ok_or(ResponseError::MissingField("description"))?;

    Ok(RawFinding {
        lines,
        severity,
        category,
        description,
        risk_snippet: string_field(field("risk_snippet")).unwrap_or_default(),
        payload_example: string_field(field("payload_example")).unwrap_or_default(),
        remediation: string_field(field("remediation")).unwrap_or_default(),
    })
}

/// The line-number field is accepted as a single integer or a list of
/// integers; anything non-numeric in a list is skipped.
fn decode_lines(value: &Value) -> Vec<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as u32).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_u64().map(|n| n as u32))
            .collect(),
        _ => Vec::new(),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPLY: &str = r#"
Here is what I found:

```json
[
    {
        "lines": [2, 5],
        "severity": "high",
        "category": "command-injection",
        "description": "argument passed straight to exec",
        "risk_snippet": "exec(cmd)",
        "payload_example": "; rm -rf /",
        "remediation": "whitelist the command"
    },
    {
        " lines ": 7,
        "severity": "Low",
        "category": "hardcoded-secret",
        "description": "api key in source"
    }
]
```
"#;

    #[test]
    fn decodes_fenced_array_reply() {
        let findings = decode_findings(REPLY).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].lines, vec![2, 5]);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].category, "command-injection");
        assert_eq!(findings[0].payload_example, "; rm -rf /");
        // scalar line number and padded key both normalize
        assert_eq!(findings[1].lines, vec![7]);
        assert_eq!(findings[1].severity, Severity::Low);
        assert_eq!(findings[1].remediation, "");
    }

    #[test]
    fn decodes_bare_single_object() {
        let body = r#"{"lines": [3], "severity": "medium", "category": "xss", "description": "unescaped output"}"#;
        let findings = decode_findings(body).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "xss");
    }

    #[test]
    fn keeps_sentinel_findings_for_the_caller() {
        let body = r#"{"lines": [], "severity": "low", "category": "none", "description": "no issues found"}"#;
        let findings = decode_findings(body).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_clean_marker());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let body = r#"{"lines": [1], "severity": "high", "description": "no category"}"#;
        match decode_findings(body) {
            Err(ResponseError::MissingField(field)) => assert_eq!(field, "category"),
            other => panic!("expected missing-field error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_severity() {
        let body = r#"{"lines": [1], "severity": "catastrophic", "category": "xss", "description": "d"}"#;
        assert!(matches!(
            decode_findings(body),
            Err(ResponseError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn rejects_non_json_noise() {
        assert!(decode_findings("the model rambled instead of emitting JSON").is_err());
    }

    #[test]
    fn scalar_payload_is_rejected() {
        assert!(matches!(
            decode_findings("42"),
            Err(ResponseError::NotAnObject)
        ));
    }
}
