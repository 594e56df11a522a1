//! Property extractors.
//!
//! A [`Property`] describes how one named value is read off a page object:
//! which element to look at (the owning scope, or a sub-selector below it)
//! and what to extract from it.

use serde_json::{Map, Value};

use crate::element::{ElementHandle, ElementResolver};
use crate::options::QueryOptions;
use crate::result::{PageError, PageResult};
use crate::scope::Scope;

/// Known extractor kinds, as spelled in definitions
pub const PROPERTY_KINDS: [&str; 7] = [
    "text",
    "hasClass",
    "notHasClass",
    "isPresent",
    "attribute",
    "value",
    "count",
];

/// How a named property is read from an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// Text content (string)
    Text {
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
    /// Class membership (bool)
    HasClass {
        /// Class name
        class: String,
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
    /// Negated class membership (bool)
    NotHasClass {
        /// Class name
        class: String,
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
    /// At least one element matches (bool)
    IsPresent {
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
    /// Attribute value (string or null)
    Attribute {
        /// Attribute name
        name: String,
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
    /// The `value` attribute (string or null)
    Value {
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
    /// Number of matching elements (number)
    Count {
        /// Sub-selector below the owning scope
        selector: Option<String>,
    },
}

impl Property {
    /// Text of the owning element
    #[must_use]
    pub const fn text() -> Self {
        Self::Text { selector: None }
    }

    /// Text of the element matching `selector` below the owning scope
    #[must_use]
    pub fn text_of(selector: impl Into<String>) -> Self {
        Self::Text {
            selector: Some(selector.into()),
        }
    }

    /// Whether the owning element carries `class`
    #[must_use]
    pub fn has_class(class: impl Into<String>) -> Self {
        Self::HasClass {
            class: class.into(),
            selector: None,
        }
    }

    /// Whether the owning element lacks `class`
    #[must_use]
    pub fn not_has_class(class: impl Into<String>) -> Self {
        Self::NotHasClass {
            class: class.into(),
            selector: None,
        }
    }

    /// Whether the owning scope matches anything
    #[must_use]
    pub const fn is_present() -> Self {
        Self::IsPresent { selector: None }
    }

    /// Attribute of the owning element
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            selector: None,
        }
    }

    /// `value` attribute of the owning element
    #[must_use]
    pub const fn value() -> Self {
        Self::Value { selector: None }
    }

    /// Number of elements matching `selector` below the owning scope
    #[must_use]
    pub fn count(selector: impl Into<String>) -> Self {
        Self::Count {
            selector: Some(selector.into()),
        }
    }

    /// Read from the element matching `sub` below the owning scope instead
    #[must_use]
    pub fn within(self, sub: impl Into<String>) -> Self {
        let sub = Some(sub.into());
        match self {
            Self::Text { .. } => Self::Text { selector: sub },
            Self::HasClass { class, .. } => Self::HasClass {
                class,
                selector: sub,
            },
            Self::NotHasClass { class, .. } => Self::NotHasClass {
                class,
                selector: sub,
            },
            Self::IsPresent { .. } => Self::IsPresent { selector: sub },
            Self::Attribute { name, .. } => Self::Attribute {
                name,
                selector: sub,
            },
            Self::Value { .. } => Self::Value { selector: sub },
            Self::Count { .. } => Self::Count { selector: sub },
        }
    }

    /// Kind name as spelled in definitions
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::HasClass { .. } => "hasClass",
            Self::NotHasClass { .. } => "notHasClass",
            Self::IsPresent { .. } => "isPresent",
            Self::Attribute { .. } => "attribute",
            Self::Value { .. } => "value",
            Self::Count { .. } => "count",
        }
    }

    fn selector(&self) -> Option<&str> {
        match self {
            Self::Text { selector }
            | Self::HasClass { selector, .. }
            | Self::NotHasClass { selector, .. }
            | Self::IsPresent { selector }
            | Self::Attribute { selector, .. }
            | Self::Value { selector }
            | Self::Count { selector } => selector.as_deref(),
        }
    }

    /// Evaluate against the live document below `scope`
    pub fn extract(
        &self,
        resolver: &dyn ElementResolver,
        scope: &Scope,
        options: &QueryOptions,
    ) -> PageResult<Value> {
        let target = match self.selector() {
            Some(sub) => scope.join(sub),
            None => scope.clone(),
        };

        let value = match self {
            Self::IsPresent { .. } => Value::Bool(resolver.count(&target)? > 0),
            Self::Count { .. } => Value::from(resolver.count(&target)?),
            Self::Text { .. } => {
                let el = single(resolver, &target)?;
                Value::String(if options.normalize_text {
                    el.normalized_text()
                } else {
                    el.text
                })
            }
            Self::HasClass { class, .. } => Value::Bool(single(resolver, &target)?.has_class(class)),
            Self::NotHasClass { class, .. } => {
                Value::Bool(!single(resolver, &target)?.has_class(class))
            }
            Self::Attribute { name, .. } => {
                single(resolver, &target)?.attribute(name).map_or(Value::Null, Value::from)
            }
            Self::Value { .. } => single(resolver, &target)?
                .attribute("value")
                .map_or(Value::Null, Value::from),
        };

        tracing::trace!(kind = self.kind(), scope = %target, %value, "extracted property");
        Ok(value)
    }

    /// Parse a property from its definition form.
    ///
    /// Accepts a bare kind (`text`, `isPresent`, `value`, `count`) or a
    /// single-kind mapping such as `{ hasClass: is-active }`, optionally with
    /// a `selector` key.
    pub fn from_definition(name: &str, spec: &Value) -> PageResult<Self> {
        match spec {
            Value::String(kind) => Self::from_kind(name, kind, None, None),
            Value::Object(map) => Self::from_mapping(name, map),
            other => Err(PageError::config(format!(
                "property '{name}' must be a kind name or a mapping, got {other}"
            ))),
        }
    }

    fn from_mapping(name: &str, map: &Map<String, Value>) -> PageResult<Self> {
        let selector = match map.get("selector") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(PageError::config(format!(
                    "property '{name}': selector must be a string, got {other}"
                )))
            }
        };

        let mut kinds = map.iter().filter(|(key, _)| key.as_str() != "selector");
        let (kind, arg) = match (kinds.next(), kinds.next()) {
            (Some(entry), None) => entry,
            (None, _) => {
                return Err(PageError::config(format!(
                    "property '{name}' does not name a kind"
                )))
            }
            (Some(_), Some(_)) => {
                return Err(PageError::config(format!(
                    "property '{name}' names more than one kind"
                )))
            }
        };

        let arg = match arg {
            Value::Null => None,
            Value::String(s) => Some(s.as_str()),
            other => {
                return Err(PageError::config(format!(
                    "property '{name}': argument of '{kind}' must be a string, got {other}"
                )))
            }
        };

        Self::from_kind(name, kind, arg, selector)
    }

    fn from_kind(
        name: &str,
        kind: &str,
        arg: Option<&str>,
        selector: Option<String>,
    ) -> PageResult<Self> {
        let required = |what: &str| {
            arg.map(str::to_string).ok_or_else(|| {
                PageError::config(format!("property '{name}': '{kind}' needs a {what}"))
            })
        };

        match kind {
            // the argument of a selector-only kind is its sub-selector
            "text" | "isPresent" | "value" | "count" => {
                let selector = selector.or_else(|| arg.map(str::to_string));
                Ok(match kind {
                    "text" => Self::Text { selector },
                    "isPresent" => Self::IsPresent { selector },
                    "value" => Self::Value { selector },
                    _ => Self::Count { selector },
                })
            }
            "hasClass" => Ok(Self::HasClass {
                class: required("class name")?,
                selector,
            }),
            "notHasClass" => Ok(Self::NotHasClass {
                class: required("class name")?,
                selector,
            }),
            "attribute" => Ok(Self::Attribute {
                name: required("attribute name")?,
                selector,
            }),
            _ => Err(PageError::config(format!(
                "unknown property kind '{kind}' for property '{name}' (expected one of: {})",
                PROPERTY_KINDS.join(", ")
            ))),
        }
    }
}

fn single(resolver: &dyn ElementResolver, scope: &Scope) -> PageResult<ElementHandle> {
    let mut elements = resolver.resolve(scope)?;
    match elements.len() {
        0 => Err(PageError::not_found(scope)),
        1 => Ok(elements.remove(0)),
        count => Err(PageError::AmbiguousScope {
            scope: scope.to_string(),
            count,
        }),
    }
}
