//! Selector paths binding page objects and collections to a DOM subtree.
//!
//! A [`Scope`] is the ordered list of selector fragments from the document
//! root down to one page object, each optionally narrowed to a single match
//! by an index qualifier. Scopes are immutable: joining or indexing returns a
//! new value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One selector fragment of a scope path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeSegment {
    /// CSS selector matched below the previous segment
    pub selector: String,
    /// Keep only the n-th match of `selector` (document order)
    pub index: Option<usize>,
}

impl ScopeSegment {
    /// Create an unindexed segment
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            index: None,
        }
    }
}

impl fmt::Display for ScopeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}:eq({i})", self.selector),
            None => f.write_str(&self.selector),
        }
    }
}

/// Immutable selector path from the document root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    segments: Vec<ScopeSegment>,
}

impl Scope {
    /// The document root (no segments)
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a scope with a single fragment
    #[must_use]
    pub fn new(selector: &str) -> Self {
        Self::root().join(selector)
    }

    /// Append a selector fragment. Blank fragments leave the scope unchanged.
    #[must_use]
    pub fn join(&self, selector: &str) -> Self {
        let selector = selector.trim();
        let mut segments = self.segments.clone();
        if !selector.is_empty() {
            segments.push(ScopeSegment::new(selector));
        }
        Self { segments }
    }

    /// Narrow the last fragment to its `index`-th match
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.index = Some(index);
        }
        Self { segments }
    }

    /// The same path with the index qualifier of the last fragment removed
    #[must_use]
    pub fn without_index(&self) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.index = None;
        }
        Self { segments }
    }

    /// Index qualifier of the last fragment
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.segments.last().and_then(|s| s.index)
    }

    /// All fragments, root first
    #[must_use]
    pub fn segments(&self) -> &[ScopeSegment] {
        &self.segments
    }

    /// Whether this is the document root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
