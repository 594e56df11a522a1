//! Element snapshots and the resolver seam.
//!
//! Page objects never hold live DOM references. Every read goes through an
//! [`ElementResolver`], which turns a [`Scope`] into owned [`ElementHandle`]
//! snapshots of whatever the document contains at that moment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::result::PageResult;
use crate::scope::Scope;

/// Owned snapshot of one matched element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Lowercase tag name
    pub tag: String,
    /// Concatenated text content, not normalized
    pub text: String,
    /// Class list in source order
    pub classes: Vec<String>,
    /// Attributes by name
    pub attributes: BTreeMap<String, String>,
}

impl ElementHandle {
    /// Create an element snapshot with only a tag name
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Whether the class list contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content with whitespace runs collapsed and ends trimmed
    #[must_use]
    pub fn normalized_text(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Resolves scopes against a document.
///
/// Implementations must return matches in document order and give the same
/// answer for repeated calls against an unchanged document. An indexed
/// segment keeps only the n-th match of its selector.
pub trait ElementResolver {
    /// Resolve `scope` to every currently matching element
    fn resolve(&self, scope: &Scope) -> PageResult<Vec<ElementHandle>>;

    /// Number of elements currently matching `scope`
    fn count(&self, scope: &Scope) -> PageResult<usize> {
        self.resolve(scope).map(|elements| elements.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let el = ElementHandle::new("li")
            .with_text("  Bar \n ")
            .with_class("item")
            .with_class("is-active")
            .with_attribute("data-id", "2");

        assert!(el.has_class("is-active"));
        assert!(!el.has_class("active"));
        assert_eq!(el.attribute("data-id"), Some("2"));
        assert_eq!(el.attribute("missing"), None);
        assert_eq!(el.normalized_text(), "Bar");
    }

    #[test]
    fn test_normalized_text_collapses_inner_whitespace() {
        let el = ElementHandle::new("p").with_text("Hello,\n     List!\t");
        assert_eq!(el.normalized_text(), "Hello, List!");
    }

    #[test]
    fn test_default_count_uses_resolve() {
        struct Fixed;

        impl ElementResolver for Fixed {
            fn resolve(&self, _scope: &Scope) -> PageResult<Vec<ElementHandle>> {
                Ok(vec![ElementHandle::new("li"), ElementHandle::new("li")])
            }
        }

        assert_eq!(Fixed.count(&Scope::new("li")).unwrap(), 2);
    }
}
