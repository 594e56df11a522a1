//! HTML-backed element resolver.
//!
//! [`HtmlDocument`] parses markup with `scraper` and answers scope queries
//! against the current tree. Content can be swapped at any time with
//! [`HtmlDocument::set_content`]; page objects bound to the document see the
//! new markup on their next read.

use scraper::{ElementRef, Html, Selector};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::element::{ElementHandle, ElementResolver};
use crate::result::{PageError, PageResult};
use crate::scope::Scope;

/// A live, replaceable HTML document
pub struct HtmlDocument {
    html: RefCell<Html>,
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument").finish_non_exhaustive()
    }
}

impl HtmlDocument {
    /// Parse a document (or fragment) from markup
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: RefCell::new(Html::parse_document(markup)),
        }
    }

    /// Read and parse a document from disk
    pub fn from_file(path: impl AsRef<Path>) -> PageResult<Self> {
        let markup = std::fs::read_to_string(path)?;
        Ok(Self::parse(&markup))
    }

    /// Replace the document content
    pub fn set_content(&self, markup: &str) {
        tracing::debug!(bytes = markup.len(), "replacing document content");
        *self.html.borrow_mut() = Html::parse_document(markup);
    }
}

fn parse_selector(selector: &str) -> PageResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| PageError::config(format!("invalid selector '{selector}': {e}")))
}

fn snapshot(element: ElementRef<'_>) -> ElementHandle {
    let value = element.value();
    ElementHandle {
        tag: value.name().to_string(),
        text: element.text().collect(),
        classes: value.classes().map(str::to_string).collect(),
        attributes: value
            .attrs()
            .map(|(name, v)| (name.to_string(), v.to_string()))
            .collect(),
    }
}

fn matching<'a>(html: &'a Html, scope: &Scope) -> PageResult<Vec<ElementRef<'a>>> {
    if scope.is_root() {
        return Ok(vec![html.root_element()]);
    }

    let mut current: Vec<ElementRef<'a>> = Vec::new();
    for (depth, segment) in scope.segments().iter().enumerate() {
        let selector = parse_selector(&segment.selector)?;
        let mut matches: Vec<ElementRef<'a>> = if depth == 0 {
            html.select(&selector).collect()
        } else {
            let parents: HashSet<_> = current.iter().map(|p| p.id()).collect();
            html.select(&selector)
                .filter(|el| el.ancestors().any(|a| parents.contains(&a.id())))
                .collect()
        };

        if let Some(index) = segment.index {
            matches = matches.into_iter().nth(index).into_iter().collect();
        }

        if matches.is_empty() {
            tracing::trace!(%scope, depth, "scope resolved to no elements");
            return Ok(Vec::new());
        }
        current = matches;
    }

    tracing::trace!(%scope, matches = current.len(), "resolved scope");
    Ok(current)
}

impl ElementResolver for HtmlDocument {
    fn resolve(&self, scope: &Scope) -> PageResult<Vec<ElementHandle>> {
        let html = self.html.borrow();
        Ok(matching(&html, scope)?.into_iter().map(snapshot).collect())
    }

    // Counted on every item read; skip building snapshots.
    fn count(&self, scope: &Scope) -> PageResult<usize> {
        let html = self.html.borrow();
        Ok(matching(&html, scope)?.len())
    }
}
