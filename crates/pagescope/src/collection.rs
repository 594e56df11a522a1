//! Collections of repeated elements.
//!
//! A [`Collection`] stands for every element matching its scope, in document
//! order. It never stores elements: `count`, iteration and queries resolve
//! the scope again on each call, and every [`ItemView`] they hand out is
//! built fresh from `(scope, index)` and re-resolved when read.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::definition::PageDefinition;
use crate::element::ElementResolver;
use crate::matcher::Matcher;
use crate::options::{FindOnePolicy, QueryOptions};
use crate::page_object::{expect_bool, expect_string, PageObject};
use crate::result::{PageError, PageResult};
use crate::scope::Scope;

/// Zero or more repeated elements under one scope
#[derive(Clone)]
pub struct Collection {
    name: String,
    scope: Scope,
    item: Rc<PageDefinition>,
    resolver: Rc<dyn ElementResolver>,
    options: QueryOptions,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("scope", &self.scope.to_string())
            .finish_non_exhaustive()
    }
}

impl Collection {
    pub(crate) fn new(
        name: impl Into<String>,
        scope: Scope,
        item: Rc<PageDefinition>,
        resolver: Rc<dyn ElementResolver>,
        options: QueryOptions,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            item,
            resolver,
            options,
        }
    }

    /// Name the collection was registered under
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope matching every item
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Number of elements currently matching the scope
    pub fn count(&self) -> PageResult<usize> {
        self.resolver.count(&self.scope)
    }

    /// Item view for the `index`-th match. The range is checked when a
    /// property is read, not here.
    #[must_use]
    pub fn object_at(&self, index: usize) -> ItemView {
        ItemView {
            page: PageObject::bind(
                Rc::clone(&self.item),
                self.scope.at(index),
                Rc::clone(&self.resolver),
                self.options.clone(),
            ),
            collection_scope: self.scope.clone(),
            index,
        }
    }

    /// Views for every current item, in document order
    pub fn items(&self) -> PageResult<Vec<ItemView>> {
        Ok((0..self.count()?).map(|i| self.object_at(i)).collect())
    }

    /// Apply `f` to every item
    pub fn map<T, F>(&self, mut f: F) -> PageResult<Vec<T>>
    where
        F: FnMut(&ItemView) -> PageResult<T>,
    {
        let items = self.items()?;
        items.iter().map(&mut f).collect()
    }

    /// Read property `name` of every item
    pub fn map_by(&self, name: &str) -> PageResult<Vec<Value>> {
        if self.item.property(name).is_none() {
            return Err(PageError::config(format!(
                "mapBy on '{}' collection uses unknown property '{name}' (known: {})",
                self.name,
                self.item.property_names().join(", ")
            )));
        }
        self.map(|item| item.get(name))
    }

    /// Run `f` on every item
    pub fn for_each<F>(&self, mut f: F) -> PageResult<()>
    where
        F: FnMut(&ItemView) -> PageResult<()>,
    {
        for item in self.items()? {
            f(&item)?;
        }
        Ok(())
    }

    /// Every item satisfying `matcher`, in document order
    pub fn find_all(&self, matcher: &Matcher<'_>) -> PageResult<Vec<ItemView>> {
        matcher.check_fields(&self.item, &self.name)?;

        let mut found = Vec::new();
        for item in self.items()? {
            if matcher.matches(&item)? {
                found.push(item);
            }
        }

        tracing::debug!(
            collection = %self.name,
            scope = %self.scope,
            matches = found.len(),
            "findAll"
        );
        Ok(found)
    }

    /// The single item satisfying `matcher`.
    ///
    /// Fails with [`PageError::QueryCardinality`] when zero or several items
    /// match.
    pub fn find_one(&self, matcher: &Matcher<'_>) -> PageResult<ItemView> {
        matcher.check_fields(&self.item, &self.name)?;

        let mut found = Vec::new();
        let mut stopped_early = false;
        for item in self.items()? {
            if matcher.matches(&item)? {
                found.push(item);
                if self.options.find_one == FindOnePolicy::StopAtSecond && found.len() == 2 {
                    stopped_early = true;
                    break;
                }
            }
        }

        tracing::debug!(
            collection = %self.name,
            scope = %self.scope,
            matches = found.len(),
            stopped_early,
            "findOne"
        );

        if found.len() == 1 {
            if let Some(item) = found.pop() {
                return Ok(item);
            }
        }

        let count = if stopped_early {
            "at least 2".to_string()
        } else {
            found.len().to_string()
        };
        Err(PageError::QueryCardinality {
            collection: self.name.clone(),
            scope: self.scope.to_string(),
            count,
            query: matcher.describe(),
        })
    }
}

/// One indexed item of a collection
#[derive(Debug, Clone)]
pub struct ItemView {
    page: PageObject,
    collection_scope: Scope,
    index: usize,
}

impl ItemView {
    /// Position in the collection
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Fully-qualified scope, ending in `:eq(index)`
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        self.page.scope()
    }

    fn ensure_in_range(&self) -> PageResult<()> {
        let count = self.page.resolver().count(&self.collection_scope)?;
        if self.index >= count {
            return Err(PageError::not_found(self.page.scope()));
        }
        Ok(())
    }

    /// Read a named property
    pub fn get(&self, name: &str) -> PageResult<Value> {
        self.ensure_in_range()?;
        self.page.get(name)
    }

    /// Read a boolean property
    pub fn get_bool(&self, name: &str) -> PageResult<bool> {
        expect_bool(name, &self.get(name)?)
    }

    /// Read a string property
    pub fn get_string(&self, name: &str) -> PageResult<String> {
        expect_string(name, self.get(name)?)
    }

    /// Text content of the item
    pub fn text(&self) -> PageResult<String> {
        self.get_string("text")
    }

    /// Whether the item exists
    pub fn is_present(&self) -> PageResult<bool> {
        self.get_bool("isPresent")
    }

    /// Nested page object below the item
    pub fn page(&self, name: &str) -> PageResult<PageObject> {
        self.page.page(name)
    }

    /// Nested collection below the item
    pub fn collection(&self, name: &str) -> PageResult<Collection> {
        self.page.collection(name)
    }
}
