//! Synthetic XML document generator for abxkit.
//!
//! Produces random but plausible document trees for round-trip and diff
//! testing, plus a mutation mode that perturbs an existing document with a
//! controlled change probability.
//!
//! # Key Types
//!
//! - [`GenProfile`] — Shape parameters, loadable from TOML
//! - [`generate`] — Build a random tree from a seeded RNG
//! - [`mutate`] — Produce a known-divergent copy of a tree

pub mod generate;
pub mod profile;

pub use generate::{generate, mutate};
pub use profile::{GenProfile, ProfileError};
