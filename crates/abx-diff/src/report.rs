//! Plain-text rendering of a [`TreeDiff`] for the reporting layer.
//!
//! The line formats are stable output: downstream tooling greps these
//! diagnostic strings, so changes here are format revisions, not tweaks.

use std::fmt::Write;

use crate::record::{DiffKind, DiffRecord, TreeDiff};

/// Rendering for an absent attribute; distinct from the empty string.
const MISSING: &str = "(missing)";

/// Render a full report: the identity message for an empty diff, otherwise a
/// count followed by one bulleted line per record.
pub fn render_report(diff: &TreeDiff) -> String {
    if diff.is_empty() {
        return "- Files are semantically identical".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "- Found {} difference(s):", diff.len());
    let _ = writeln!(out);
    for record in &diff.records {
        let _ = writeln!(out, "  \u{2022} {}", render_record(record));
    }
    out
}

/// Render one record as a single diagnostic line.
pub fn render_record(record: &DiffRecord) -> String {
    let path = &record.path;
    match &record.kind {
        DiffKind::TagMismatch { left, right } => {
            format!("{path}: Tag differs - '{left}' vs '{right}'")
        }
        DiffKind::AttributeMismatch { name, left, right } => {
            let left = left.as_deref().unwrap_or(MISSING);
            let right = right.as_deref().unwrap_or(MISSING);
            format!("{path}[@{name}]: '{left}' vs '{right}'")
        }
        DiffKind::TextMismatch { left, right } => {
            format!("{path}/text(): '{left}' vs '{right}'")
        }
        DiffKind::TailMismatch { left, right } => {
            format!("{path}/tail(): '{left}' vs '{right}'")
        }
        DiffKind::ChildCountMismatch { left, right } => {
            format!("{path}: Different number of children - {left} vs {right}")
        }
        DiffKind::ExtraInLeft { tag } => {
            format!("{path}: Extra element in file1 - {tag}")
        }
        DiffKind::ExtraInRight { tag } => {
            format!("{path}: Extra element in file2 - {tag}")
        }
        DiffKind::DepthExceeded => {
            format!("{path}: Maximum comparison depth exceeded")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diff_renders_identity_message() {
        assert_eq!(
            render_report(&TreeDiff::new()),
            "- Files are semantically identical"
        );
    }

    #[test]
    fn attribute_line_format() {
        let record = DiffRecord::new(
            "/n",
            DiffKind::AttributeMismatch {
                name: "b".into(),
                left: Some("2".into()),
                right: None,
            },
        );
        assert_eq!(render_record(&record), "/n[@b]: '2' vs '(missing)'");
    }

    #[test]
    fn empty_value_renders_distinct_from_missing() {
        let record = DiffRecord::new(
            "/n",
            DiffKind::AttributeMismatch {
                name: "a".into(),
                left: Some(String::new()),
                right: None,
            },
        );
        assert_eq!(render_record(&record), "/n[@a]: '' vs '(missing)'");
    }

    #[test]
    fn child_count_line_format() {
        let record = DiffRecord::new("/n", DiffKind::ChildCountMismatch { left: 2, right: 1 });
        assert_eq!(
            render_record(&record),
            "/n: Different number of children - 2 vs 1"
        );
    }

    #[test]
    fn extra_element_line_formats() {
        let left = DiffRecord::new("/n", DiffKind::ExtraInLeft { tag: "q".into() });
        let right = DiffRecord::new("/n", DiffKind::ExtraInRight { tag: "q".into() });
        assert_eq!(render_record(&left), "/n: Extra element in file1 - q");
        assert_eq!(render_record(&right), "/n: Extra element in file2 - q");
    }

    #[test]
    fn text_and_tail_line_formats() {
        let text = DiffRecord::new(
            "/r/a",
            DiffKind::TextMismatch {
                left: "x".into(),
                right: "y".into(),
            },
        );
        let tail = DiffRecord::new(
            "/r/a",
            DiffKind::TailMismatch {
                left: "x".into(),
                right: "y".into(),
            },
        );
        assert_eq!(render_record(&text), "/r/a/text(): 'x' vs 'y'");
        assert_eq!(render_record(&tail), "/r/a/tail(): 'x' vs 'y'");
    }

    #[test]
    fn report_counts_and_itemizes() {
        let diff = TreeDiff {
            records: vec![
                DiffRecord::new(
                    "",
                    DiffKind::TagMismatch {
                        left: "x".into(),
                        right: "y".into(),
                    },
                ),
            ],
        };
        let report = render_report(&diff);
        assert!(report.starts_with("- Found 1 difference(s):"));
        assert!(report.contains(": Tag differs - 'x' vs 'y'"));
    }
}
