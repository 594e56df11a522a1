//! Page objects bound to a live document.
//!
//! A [`PageObject`] pairs a [`PageDefinition`] with a concrete [`Scope`] and
//! the resolver it reads from. Nothing is cached: every property read
//! resolves the scope again, so reads always reflect the current document.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use pagescope::{HtmlDocument, PageDefinition, PageObject, Property};
//!
//! let doc = Rc::new(HtmlDocument::parse(
//!     "<div class=list><h2>Hello, List!</h2><ul><li>Foo</li><li>Bar</li></ul></div>",
//! ));
//! let definition = PageDefinition::new(".list")
//!     .with_property("caption", Property::text_of("h2"))
//!     .with_collection("items", PageDefinition::new("li"));
//!
//! let page = PageObject::new(definition, doc).unwrap();
//! assert_eq!(page.get_string("caption").unwrap(), "Hello, List!");
//! assert_eq!(page.collection("items").unwrap().count().unwrap(), 2);
//! ```

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::collection::Collection;
use crate::definition::PageDefinition;
use crate::element::ElementResolver;
use crate::options::QueryOptions;
use crate::result::{PageError, PageResult};
use crate::scope::Scope;

/// A page definition bound to a scope and a document
#[derive(Clone)]
pub struct PageObject {
    definition: Rc<PageDefinition>,
    scope: Scope,
    resolver: Rc<dyn ElementResolver>,
    options: QueryOptions,
}

impl fmt::Debug for PageObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageObject")
            .field("scope", &self.scope.to_string())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PageObject {
    /// Validate `definition` and bind it at the document root.
    ///
    /// Options attached to the definition apply to the whole tree.
    pub fn new(definition: PageDefinition, resolver: Rc<dyn ElementResolver>) -> PageResult<Self> {
        definition.validate()?;
        let options = definition.options().cloned().unwrap_or_default();
        let scope = Scope::new(definition.scope());
        tracing::debug!(%scope, "binding page object");
        Ok(Self::bind(Rc::new(definition), scope, resolver, options))
    }

    pub(crate) fn bind(
        definition: Rc<PageDefinition>,
        scope: Scope,
        resolver: Rc<dyn ElementResolver>,
        options: QueryOptions,
    ) -> Self {
        Self {
            definition,
            scope,
            resolver,
            options,
        }
    }

    /// Replace the options for this page object and its children
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Fully-qualified scope
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Definition this page object was built from
    #[must_use]
    pub fn definition(&self) -> &PageDefinition {
        &self.definition
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub(crate) fn resolver(&self) -> &dyn ElementResolver {
        self.resolver.as_ref()
    }

    /// Read a named property
    pub fn get(&self, name: &str) -> PageResult<Value> {
        let property = self.definition.property(name).ok_or_else(|| {
            PageError::config(format!(
                "unknown property '{name}' on page object '{}' (known: {})",
                self.scope,
                self.definition.property_names().join(", ")
            ))
        })?;
        property.extract(self.resolver(), &self.scope, &self.options)
    }

    /// Read a boolean property
    pub fn get_bool(&self, name: &str) -> PageResult<bool> {
        expect_bool(name, &self.get(name)?)
    }

    /// Read a string property
    pub fn get_string(&self, name: &str) -> PageResult<String> {
        expect_string(name, self.get(name)?)
    }

    /// Text content of this page object's element
    pub fn text(&self) -> PageResult<String> {
        self.get_string("text")
    }

    /// Whether this page object's scope matches anything
    pub fn is_present(&self) -> PageResult<bool> {
        self.get_bool("isPresent")
    }

    /// Nested page object by name
    pub fn page(&self, name: &str) -> PageResult<Self> {
        let child = self.definition.page(name).ok_or_else(|| {
            PageError::config(format!("unknown page '{name}' on page object '{}'", self.scope))
        })?;
        Ok(Self::bind(
            Rc::clone(child),
            self.scope.join(child.scope()),
            Rc::clone(&self.resolver),
            self.options.clone(),
        ))
    }

    /// Collection by name
    pub fn collection(&self, name: &str) -> PageResult<Collection> {
        let item = self.definition.collection(name).ok_or_else(|| {
            PageError::config(format!(
                "unknown collection '{name}' on page object '{}'",
                self.scope
            ))
        })?;
        Ok(Collection::new(
            name,
            self.scope.join(item.scope()),
            Rc::clone(item),
            Rc::clone(&self.resolver),
            self.options.clone(),
        ))
    }
}

pub(crate) fn expect_bool(name: &str, value: &Value) -> PageResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| PageError::config(format!("property '{name}' is not a boolean: {value}")))
}

pub(crate) fn expect_string(name: &str, value: Value) -> PageResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(PageError::config(format!(
            "property '{name}' is not a string: {other}"
        ))),
    }
}
