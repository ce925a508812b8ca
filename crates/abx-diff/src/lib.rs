//! Semantic tree comparator for abxkit.
//!
//! Determines whether two parsed XML documents are semantically equivalent --
//! ignoring leading/trailing whitespace in text content -- and reports every
//! structural or content divergence as an ordered list of [`DiffRecord`]s.
//!
//! # Key Types
//!
//! - [`TreeDiff`] / [`DiffRecord`] / [`DiffKind`] -- The comparison result
//! - [`diff_elements`] / [`Comparator`] -- The comparison entry points
//! - [`report`] -- Plain-text rendering of a diff
//!
//! Comparison is pure and deterministic: no I/O, no shared state, and the
//! same two trees always produce byte-identical output. Child pairing is
//! strictly positional by design -- an inserted or deleted sibling shifts
//! every later pair and is reported as such, not realigned.

pub mod compare;
pub mod record;
pub mod report;

pub use compare::{diff_elements, Comparator, DEFAULT_MAX_DEPTH};
pub use record::{DiffKind, DiffRecord, TreeDiff};
pub use report::{render_record, render_report};
