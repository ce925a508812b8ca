use serde::Serialize;

/// The result of comparing two element trees.
///
/// An empty diff means the documents are semantically identical. Records are
/// appended in depth-first preorder and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeDiff {
    /// The list of divergences between the left and right trees.
    pub records: Vec<DiffRecord>,
}

impl TreeDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no divergences.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of divergences.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// One reported discrepancy between two compared trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    /// Slash-separated tag path of the node being compared. The path is built
    /// from tag names only; same-tag siblings share a path.
    pub path: String,
    #[serde(flatten)]
    pub kind: DiffKind,
}

impl DiffRecord {
    pub fn new(path: impl Into<String>, kind: DiffKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// What kind of divergence a record describes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffKind {
    /// The paired nodes have different tags. The record carries the parent
    /// path; nothing below this pair is compared.
    TagMismatch { left: String, right: String },
    /// An attribute differs, including one side missing it entirely. `None`
    /// means absent, which is distinct from `Some("")`.
    AttributeMismatch {
        name: String,
        left: Option<String>,
        right: Option<String>,
    },
    /// Trim-normalized text content differs.
    TextMismatch { left: String, right: String },
    /// Trim-normalized tail content differs.
    TailMismatch { left: String, right: String },
    /// The nodes have different numbers of children.
    ChildCountMismatch { left: usize, right: usize },
    /// An unpaired trailing child on the left side (tag only, not expanded).
    ExtraInLeft { tag: String },
    /// An unpaired trailing child on the right side.
    ExtraInRight { tag: String },
    /// The comparison depth cap was reached; the subtree below was skipped.
    DepthExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diff() {
        let diff = TreeDiff::new();
        assert!(diff.is_empty());
        assert_eq!(diff.len(), 0);
    }

    #[test]
    fn records_serialize_with_flattened_kind() {
        let record = DiffRecord::new(
            "/root/user",
            DiffKind::AttributeMismatch {
                name: "id".into(),
                left: Some("1".into()),
                right: None,
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["path"], "/root/user");
        assert_eq!(json["kind"], "attribute_mismatch");
        assert_eq!(json["name"], "id");
        assert_eq!(json["left"], "1");
        assert!(json["right"].is_null());
    }

    #[test]
    fn depth_record_serializes() {
        let record = DiffRecord::new("/a", DiffKind::DepthExceeded);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "depth_exceeded");
    }
}
