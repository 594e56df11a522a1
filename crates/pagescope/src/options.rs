//! Runtime options shared by a page object and everything below it.

use serde::{Deserialize, Serialize};

/// How `findOne` counts matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindOnePolicy {
    /// Evaluate every item; the error reports the exact count
    #[default]
    ScanAll,
    /// Stop at the second match; the error reports "at least 2"
    StopAtSecond,
}

/// Options for reads and collection queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Trim text and collapse whitespace runs
    pub normalize_text: bool,
    /// Counting policy for `findOne`
    pub find_one: FindOnePolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            normalize_text: true,
            find_one: FindOnePolicy::ScanAll,
        }
    }
}

impl QueryOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable text normalization
    #[must_use]
    pub const fn with_normalize_text(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Set the `findOne` counting policy
    #[must_use]
    pub const fn with_find_one(mut self, policy: FindOnePolicy) -> Self {
        self.find_one = policy;
        self
    }
}
