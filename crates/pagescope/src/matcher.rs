//! Collection item matchers.

use serde_json::Value;
use std::fmt;

use crate::collection::ItemView;
use crate::definition::PageDefinition;
use crate::result::{PageError, PageResult};

type ItemPredicate<'a> = Box<dyn Fn(&ItemView) -> PageResult<bool> + 'a>;

/// Filter for `find_all` / `find_one`.
///
/// Predicates may borrow from the caller for `'a`.
pub enum Matcher<'a> {
    /// Arbitrary check, evaluated once per item
    Predicate(ItemPredicate<'a>),
    /// Every listed property must equal its expected value
    FieldEquals(Vec<(String, Value)>),
}

impl fmt::Debug for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Matcher::Predicate(..)"),
            Self::FieldEquals(fields) => f.debug_tuple("Matcher::FieldEquals").field(fields).finish(),
        }
    }
}

impl<'a> Matcher<'a> {
    /// Match items for which `predicate` returns `true`
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&ItemView) -> PageResult<bool> + 'a,
    {
        Self::Predicate(Box::new(predicate))
    }

    /// Match items whose properties equal the given values, in order
    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::FieldEquals(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Build a field matcher from a JSON object such as
    /// `{"text": "Bar", "isActive": true}`
    pub fn shorthand(query: Value) -> PageResult<Self> {
        match query {
            Value::Object(map) => Ok(Self::FieldEquals(map.into_iter().collect())),
            other => Err(PageError::config(format!(
                "shorthand matcher must map property names to values, got {other}"
            ))),
        }
    }

    /// Match every item
    #[must_use]
    pub fn any() -> Self {
        Self::FieldEquals(Vec::new())
    }

    /// Evaluate against one item
    pub fn matches(&self, item: &ItemView) -> PageResult<bool> {
        match self {
            Self::Predicate(predicate) => predicate(item),
            Self::FieldEquals(fields) => {
                for (name, expected) in fields {
                    if item.get(name)? != *expected {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Reject field matchers naming properties the item does not define
    pub(crate) fn check_fields(&self, item: &PageDefinition, collection: &str) -> PageResult<()> {
        if let Self::FieldEquals(fields) = self {
            if let Some((name, _)) = fields.iter().find(|(name, _)| item.property(name).is_none()) {
                return Err(PageError::config(format!(
                    "query on '{collection}' collection uses unknown property '{name}' (known: {})",
                    item.property_names().join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Readable form of a field matcher, e.g. `{text: "Foo", isActive: true}`
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Predicate(_) => None,
            Self::FieldEquals(fields) => {
                let body = fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("{{{body}}}"))
            }
        }
    }
}
