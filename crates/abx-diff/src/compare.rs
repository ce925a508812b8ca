//! The comparison algorithm: depth-first preorder descent over two trees.
//!
//! For each paired node: tag check (short-circuits the whole pair), then
//! attributes in sorted name order, then text, tail, child count, positional
//! recursion over the common child prefix, and finally one record per
//! unpaired trailing child. Children are never realigned by content.

use abx_tree::Element;

use crate::record::{DiffKind, DiffRecord, TreeDiff};

/// Default recursion cap. Deeper pairs produce a [`DiffKind::DepthExceeded`]
/// record instead of risking stack exhaustion.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Compares two element trees with a configurable depth cap.
#[derive(Clone, Copy, Debug)]
pub struct Comparator {
    max_depth: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Comparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Compare two trees.
    ///
    /// Total over its inputs: any two trees produce a result, possibly empty
    /// (meaning semantic equivalence). Calling this twice on the same pair
    /// yields identical output.
    pub fn compare(&self, left: &Element, right: &Element) -> TreeDiff {
        let mut records = Vec::new();
        self.compare_pair(left, right, "", 0, &mut records);
        TreeDiff { records }
    }

    fn compare_pair(
        &self,
        left: &Element,
        right: &Element,
        parent_path: &str,
        depth: usize,
        out: &mut Vec<DiffRecord>,
    ) {
        // A tag mismatch stops the descent for this pair entirely; the record
        // carries the parent path since neither tag names the node.
        if left.tag != right.tag {
            out.push(DiffRecord::new(
                parent_path,
                DiffKind::TagMismatch {
                    left: left.tag.clone(),
                    right: right.tag.clone(),
                },
            ));
            return;
        }

        let path = format!("{}/{}", parent_path, left.tag);

        if depth >= self.max_depth {
            out.push(DiffRecord::new(path, DiffKind::DepthExceeded));
            return;
        }

        self.compare_attributes(left, right, &path, out);

        let left_text = normalize(&left.text);
        let right_text = normalize(&right.text);
        if left_text != right_text {
            out.push(DiffRecord::new(
                path.clone(),
                DiffKind::TextMismatch {
                    left: left_text.to_string(),
                    right: right_text.to_string(),
                },
            ));
        }

        let left_tail = normalize(&left.tail);
        let right_tail = normalize(&right.tail);
        if left_tail != right_tail {
            out.push(DiffRecord::new(
                path.clone(),
                DiffKind::TailMismatch {
                    left: left_tail.to_string(),
                    right: right_tail.to_string(),
                },
            ));
        }

        if left.children.len() != right.children.len() {
            out.push(DiffRecord::new(
                path.clone(),
                DiffKind::ChildCountMismatch {
                    left: left.children.len(),
                    right: right.children.len(),
                },
            ));
        }

        // Strictly positional pairing over the common prefix.
        for (left_child, right_child) in left.children.iter().zip(&right.children) {
            self.compare_pair(left_child, right_child, &path, depth + 1, out);
        }

        let paired = left.children.len().min(right.children.len());
        for extra in &left.children[paired..] {
            out.push(DiffRecord::new(
                path.clone(),
                DiffKind::ExtraInLeft {
                    tag: extra.tag.clone(),
                },
            ));
        }
        for extra in &right.children[paired..] {
            out.push(DiffRecord::new(
                path.clone(),
                DiffKind::ExtraInRight {
                    tag: extra.tag.clone(),
                },
            ));
        }
    }

    fn compare_attributes(
        &self,
        left: &Element,
        right: &Element,
        path: &str,
        out: &mut Vec<DiffRecord>,
    ) {
        // Union of names in sorted order. Both maps iterate sorted, so the
        // merge stays sorted without collecting into a set first.
        let mut names: Vec<&str> = left.attributes.keys().map(String::as_str).collect();
        for name in right.attributes.keys() {
            if !left.attributes.contains_key(name) {
                names.push(name);
            }
        }
        names.sort_unstable();

        for name in names {
            let left_value = left.attributes.get(name);
            let right_value = right.attributes.get(name);
            if left_value != right_value {
                out.push(DiffRecord::new(
                    path,
                    DiffKind::AttributeMismatch {
                        name: name.to_string(),
                        left: left_value.cloned(),
                        right: right_value.cloned(),
                    },
                ));
            }
        }
    }
}

/// Trim-normalize optional text content; absent normalizes to empty.
fn normalize(text: &Option<String>) -> &str {
    text.as_deref().map(str::trim).unwrap_or("")
}

/// Compare two trees with the default depth cap.
pub fn diff_elements(left: &Element, right: &Element) -> TreeDiff {
    Comparator::new().compare(left, right)
}
