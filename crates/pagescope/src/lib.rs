//! pagescope: scoped page objects and query-capable collections
//!
//! Page objects wrap a DOM scope and expose named, readable properties.
//! Collections wrap repeated elements under a scope and answer queries over
//! them (`count`, `object_at`, `map`, `map_by`, `for_each`, `find_all`,
//! `find_one`). Nothing is cached: every read resolves against the live
//! document through an [`ElementResolver`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐  bind   ┌────────────┐  resolve(scope)  ┌──────────────────┐
//! │ PageDefinition │───────► │ PageObject │ ───────────────► │ ElementResolver  │
//! │ (schema tree)  │         │ Collection │ ◄─────────────── │ (HtmlDocument)   │
//! └────────────────┘         │ ItemView   │  ElementHandle   └──────────────────┘
//!                            └────────────┘
//! ```

#![warn(missing_docs)]

mod collection;
mod definition;
mod document;
mod element;
mod matcher;
mod options;
mod page_object;
mod property;
mod result;
mod scope;

#[cfg(test)]
mod fixtures;

pub use collection::{Collection, ItemView};
pub use definition::{PageDefinition, DEFAULT_PROPERTIES};
pub use document::HtmlDocument;
pub use element::{ElementHandle, ElementResolver};
pub use matcher::Matcher;
pub use options::{FindOnePolicy, QueryOptions};
pub use page_object::PageObject;
pub use property::{Property, PROPERTY_KINDS};
pub use result::{PageError, PageResult};
pub use scope::{Scope, ScopeSegment};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Collection, ElementHandle, ElementResolver, FindOnePolicy, HtmlDocument, ItemView,
        Matcher, PageDefinition, PageError, PageObject, PageResult, Property, QueryOptions, Scope,
    };
}
