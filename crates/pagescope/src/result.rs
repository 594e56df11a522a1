//! Result and error types for pagescope.

use thiserror::Error;

/// Result type for page object operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors that can occur while reading page objects and collections
#[derive(Debug, Error)]
pub enum PageError {
    /// Scope (or an indexed collection item) resolved to no element
    #[error("Element not found: {scope}")]
    NotFound {
        /// Fully-qualified scope path
        scope: String,
    },

    /// A single-element property matched several elements
    #[error(
        "Scope '{scope}' matched {count} elements. If you want to select many elements, use a collection instead"
    )]
    AmbiguousScope {
        /// Fully-qualified scope path
        scope: String,
        /// Number of matching elements
        count: usize,
    },

    /// `findOne` did not match exactly one item
    #[error(
        "Expected at most one result from 'findOne' query in '{collection}' collection (scope: '{scope}'), but found {count}{}",
        describe_query(.query.as_deref())
    )]
    QueryCardinality {
        /// Collection name
        collection: String,
        /// Collection scope path
        scope: String,
        /// Observed match count, as reported
        count: String,
        /// Serialized shorthand matcher, if any
        query: Option<String>,
    },

    /// Invalid definition, property name, selector or matcher
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// YAML definition could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON definition could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_query(query: Option<&str>) -> String {
    query.map_or_else(String::new, |q| format!(" using query {q}"))
}

impl PageError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not-found error for a scope path
    #[must_use]
    pub fn not_found(scope: impl ToString) -> Self {
        Self::NotFound {
            scope: scope.to_string(),
        }
    }

    /// Whether this is a `NotFound` error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a `QueryCardinality` error
    #[must_use]
    pub const fn is_query_cardinality(&self) -> bool {
        matches!(self, Self::QueryCardinality { .. })
    }

    /// Whether this is a `Configuration` error
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
