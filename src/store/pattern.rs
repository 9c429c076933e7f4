//! Glob selectors over state keys

use crate::error::StoreError;
use regex::Regex;

/// Compiled state key selector
///
/// `*` matches any run of characters, dots included. Everything else is
/// matched literally.
#[derive(Debug, Clone)]
pub struct Selector {
    pattern: String,
    regex: Regex,
}

impl Selector {
    /// Compile a glob pattern
    pub fn parse(pattern: &str) -> Result<Self, StoreError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let regex = Regex::new(&format!("^{}$", body)).map_err(|e| {
            StoreError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check a key against the selector
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The glob pattern as given
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
