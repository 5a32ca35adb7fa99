//! Audit rule: the catalog data file is well formed.
//!
//! Reads `message_catalog.json` from the working tree (not the copy compiled
//! into the library) and reports every malformed key, malformed template and
//! duplicate id, each at the line of the offending record.

use std::path::Path;

use anyhow::{Context, Result};
use message_catalog::{CatalogEntry, CatalogError, MessageId, MessageKey, Template, check_entries};
use rustc_hash::FxHashSet;
use serde::Deserialize;

use super::Violation;

#[derive(Debug, Deserialize)]
struct Record {
    key: String,
    template: String,
}

/// Check the catalog file `path` whose text is `content`.
pub fn check(path: &Path, content: &str) -> Result<Vec<Violation>> {
    let records: Vec<Record> = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    let record_lines = locate_records(content, &records);

    let violation = |line: usize, rule: &'static str, message: String| Violation {
        file: path.to_path_buf(),
        line,
        column: 1,
        rule,
        message,
        suggestion: None,
    };

    let mut violations = Vec::new();
    let mut entries = Vec::with_capacity(records.len());
    let mut entry_lines = Vec::with_capacity(records.len());

    for (record, line) in records.iter().zip(&record_lines) {
        match MessageKey::parse(&record.key) {
            Ok(key) => {
                entries.push(CatalogEntry::named(
                    key.id(),
                    key.description(),
                    record.template.clone(),
                ));
                entry_lines.push(*line);
            }
            Err(e) => violations.push(violation(*line, "invalid-key", e.to_string())),
        }
    }

    // Findings come back in entry order, at most one template finding then
    // at most one duplicate finding per entry.
    let mut owners = finding_owners(&entries).into_iter();
    for finding in check_entries(&entries) {
        let line = owners.next().map_or(1, |index| entry_lines[index]);
        let rule = match &finding {
            CatalogError::DuplicateMessageId { .. } => "duplicate-id",
            CatalogError::InvalidTemplate { .. } => "invalid-template",
            _ => "catalog",
        };
        violations.push(violation(line, rule, finding.to_string()));
    }

    violations.sort_by_key(|v| v.line);
    Ok(violations)
}

/// Index of the entry behind each finding `check_entries` will report.
fn finding_owners(entries: &[CatalogEntry]) -> Vec<usize> {
    let mut seen: FxHashSet<MessageId> = FxHashSet::default();
    let mut owners = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if Template::parse(&entry.template).is_err() {
            owners.push(index);
        }
        if !seen.insert(entry.id) {
            owners.push(index);
        }
    }
    owners
}

/// Line (1-indexed) of each record's `"key"` value, found by scanning
/// forward through the text in record order.
fn locate_records(content: &str, records: &[Record]) -> Vec<usize> {
    let mut cursor = 0;
    records
        .iter()
        .map(|record| {
            let needle = serde_json::to_string(&record.key).unwrap_or_default();
            match content[cursor..].find(&needle) {
                Some(offset) => {
                    cursor += offset + needle.len();
                    content[..cursor].lines().count()
                }
                None => 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(content: &str) -> Vec<Violation> {
        check(Path::new("message_catalog.json"), content).unwrap()
    }

    #[test]
    fn test_clean_catalog() {
        let violations = run(r#"[
  { "key": "TOOLS_SEVERE_ERR_ENCPW_CANNOT_ENCODE_30", "template": "cannot encode:  %s" },
  { "key": "TOOLS_INFO_ENCPW_PASSWORDS_MATCH_31", "template": "match" }
]"#);
        assert!(violations.is_empty(), "Got: {:?}", violations);
    }

    #[test]
    fn test_reports_each_problem_at_its_line() {
        let violations = run(r#"[
  { "key": "TOOLS_SEVERE_ERR_ENCPW_CANNOT_ENCODE_30", "template": "first" },
  { "key": "TOOLS_SEVERE_ERR_ENCPW_ENCODE_FAILED_30", "template": "second" },
  { "key": "TOOLS_CRITICAL_BROKEN_1", "template": "x" },
  { "key": "PLUGIN_NOTICE_STARTED_2", "template": "bad %q" }
]"#);

        let summary: Vec<(usize, &str)> = violations.iter().map(|v| (v.line, v.rule)).collect();
        assert_eq!(
            summary,
            vec![
                (3, "duplicate-id"),
                (4, "invalid-key"),
                (5, "invalid-template"),
            ]
        );
        assert!(
            violations[0].message.contains("\"first\""),
            "Got: {}",
            violations[0].message
        );
    }

    #[test]
    fn test_invalid_template_on_repeated_id_points_at_that_record() {
        let violations = run(r#"[
  { "key": "TOOLS_SEVERE_ERR_ENCPW_CANNOT_ENCODE_30", "template": "fine %s" },
  { "key": "PLUGIN_INFO_STARTED_2", "template": "ok" },
  { "key": "TOOLS_SEVERE_ERR_ENCPW_ENCODE_FAILED_30", "template": "broken %q" }
]"#);

        let summary: Vec<(usize, &str)> = violations.iter().map(|v| (v.line, v.rule)).collect();
        assert_eq!(summary, vec![(4, "invalid-template"), (4, "duplicate-id")]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(check(Path::new("message_catalog.json"), "{ not json").is_err());
    }
}
