use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Shape parameters for generated documents.
///
/// Loadable from a TOML file; every field has a default matching the stock
/// generator, so a profile only needs to name what it changes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GenProfile {
    /// Elements below this depth are leaves.
    pub max_depth: usize,
    pub min_children: usize,
    pub max_children: usize,
    pub min_attrs: usize,
    pub max_attrs: usize,
    /// Probability that an element carries text content.
    pub text_probability: f64,
}

impl Default for GenProfile {
    fn default() -> Self {
        Self {
            max_depth: 4,
            min_children: 2,
            max_children: 8,
            min_attrs: 1,
            max_attrs: 5,
            text_probability: 0.8,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid profile: {0}")]
    Invalid(String),
}

impl GenProfile {
    /// Load a profile from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path)?;
        let profile: GenProfile = toml::from_str(&text)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.min_children > self.max_children {
            return Err(ProfileError::Invalid(format!(
                "min_children ({}) exceeds max_children ({})",
                self.min_children, self.max_children
            )));
        }
        if self.min_attrs > self.max_attrs {
            return Err(ProfileError::Invalid(format!(
                "min_attrs ({}) exceeds max_attrs ({})",
                self.min_attrs, self.max_attrs
            )));
        }
        if !(0.0..=1.0).contains(&self.text_probability) {
            return Err(ProfileError::Invalid(format!(
                "text_probability ({}) outside [0, 1]",
                self.text_probability
            )));
        }
        Ok(())
    }
}
