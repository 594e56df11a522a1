//! Page definitions: the element schema tree.
//!
//! A [`PageDefinition`] names a scope fragment and what can be read below
//! it: properties, nested pages, and collections of repeated items. The
//! definition is inert; binding it to a document happens in
//! [`PageObject::new`](crate::PageObject::new).
//!
//! Definitions can be built in code or loaded from YAML/JSON:
//!
//! ```yaml
//! scope: "[data-test-simple-list]"
//! properties:
//!   caption: { text: "[data-test-simple-list-caption]" }
//! collections:
//!   items:
//!     scope: "[data-test-simple-list-item]"
//!     properties:
//!       isActive: { hasClass: is-active }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use crate::options::QueryOptions;
use crate::property::Property;
use crate::result::{PageError, PageResult};

/// Properties every definition carries unless overridden
pub const DEFAULT_PROPERTIES: [&str; 3] = ["text", "isPresent", "value"];

fn default_property(name: &str) -> Option<Property> {
    match name {
        "text" => Some(Property::text()),
        "isPresent" => Some(Property::is_present()),
        "value" => Some(Property::value()),
        _ => None,
    }
}

/// Schema of one page object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDefinition {
    scope: String,
    properties: BTreeMap<String, Property>,
    pages: BTreeMap<String, Rc<PageDefinition>>,
    collections: BTreeMap<String, Rc<PageDefinition>>,
    options: Option<QueryOptions>,
}

impl PageDefinition {
    /// Create a definition bound to a scope fragment (may be empty)
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    /// Add a named property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, property: Property) -> Self {
        let _ = self.properties.insert(name.into(), property);
        self
    }

    /// Add a nested page object
    #[must_use]
    pub fn with_page(mut self, name: impl Into<String>, page: PageDefinition) -> Self {
        let _ = self.pages.insert(name.into(), Rc::new(page));
        self
    }

    /// Add a collection whose items follow `item`
    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>, item: PageDefinition) -> Self {
        let _ = self.collections.insert(name.into(), Rc::new(item));
        self
    }

    /// Attach query options, used when this definition is bound as a root
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Scope fragment
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Options attached to this definition
    #[must_use]
    pub const fn options(&self) -> Option<&QueryOptions> {
        self.options.as_ref()
    }

    /// Look up a property, falling back to the defaults
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Property> {
        self.properties
            .get(name)
            .cloned()
            .or_else(|| default_property(name))
    }

    /// Nested page definition by name
    #[must_use]
    pub fn page(&self, name: &str) -> Option<&Rc<PageDefinition>> {
        self.pages.get(name)
    }

    /// Collection item definition by name
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&Rc<PageDefinition>> {
        self.collections.get(name)
    }

    /// All readable property names, defaults included
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        for name in DEFAULT_PROPERTIES {
            if !self.properties.contains_key(name) {
                names.push(name);
            }
        }
        names.sort_unstable();
        names
    }

    /// Check names and scopes across the whole tree
    pub fn validate(&self) -> PageResult<()> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        let names = self
            .properties
            .keys()
            .map(|n| (n.as_str(), "property"))
            .chain(self.pages.keys().map(|n| (n.as_str(), "page")))
            .chain(self.collections.keys().map(|n| (n.as_str(), "collection")));

        for (name, what) in names {
            if name.trim().is_empty() {
                return Err(PageError::config(format!(
                    "empty {what} name under scope '{}'",
                    self.scope
                )));
            }
            if let Some(previous) = seen.insert(name, what) {
                return Err(PageError::config(format!(
                    "name '{name}' is defined as both a {previous} and a {what}"
                )));
            }
        }

        for page in self.pages.values() {
            page.validate()?;
        }
        for (name, item) in &self.collections {
            if item.scope.trim().is_empty() {
                return Err(PageError::config(format!(
                    "collection '{name}' needs a scope"
                )));
            }
            item.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a YAML definition
    pub fn from_yaml(yaml: &str) -> PageResult<Self> {
        let raw: RawDefinition = serde_yaml_ng::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Parse and validate a JSON definition
    pub fn from_json(json: &str) -> PageResult<Self> {
        let raw: RawDefinition = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Load a definition file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading page definition");
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    fn from_raw(raw: RawDefinition) -> PageResult<Self> {
        let definition = raw.build()?;
        definition.validate()?;
        Ok(definition)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    #[serde(default)]
    scope: String,
    #[serde(default)]
    properties: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pages: BTreeMap<String, RawDefinition>,
    #[serde(default)]
    collections: BTreeMap<String, RawDefinition>,
    #[serde(default)]
    options: Option<QueryOptions>,
}

impl RawDefinition {
    fn build(self) -> PageResult<PageDefinition> {
        let mut definition = PageDefinition::new(self.scope);
        definition.options = self.options;
        for (name, spec) in &self.properties {
            let property = Property::from_definition(name, spec)?;
            let _ = definition.properties.insert(name.clone(), property);
        }
        for (name, page) in self.pages {
            let _ = definition.pages.insert(name, Rc::new(page.build()?));
        }
        for (name, item) in self.collections {
            let _ = definition.collections.insert(name, Rc::new(item.build()?));
        }
        Ok(definition)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fixtures::simple_list_page;
    use crate::options::FindOnePolicy;

    const SIMPLE_LIST_YAML: &str = r#"
scope: "[data-test-simple-list]"
properties:
  caption: { text: "[data-test-simple-list-caption]" }
collections:
  items:
    scope: "[data-test-simple-list-item]"
    properties:
      isActive: { hasClass: is-active }
"#;

    mod builder_tests {
        use super::*;

        #[test]
        fn test_defaults_are_readable() {
            let def = PageDefinition::new("ul");
            assert_eq!(def.property("text"), Some(Property::text()));
            assert_eq!(def.property("isPresent"), Some(Property::is_present()));
            assert_eq!(def.property("value"), Some(Property::value()));
            assert_eq!(def.property("caption"), None);
        }

        #[test]
        fn test_user_property_overrides_default() {
            let def = PageDefinition::new("ul").with_property("text", Property::text_of("h1"));
            assert_eq!(def.property("text"), Some(Property::text_of("h1")));
        }

        #[test]
        fn test_property_names() {
            let def = simple_list_page();
            assert_eq!(def.property_names(), vec!["caption", "isPresent", "text", "value"]);
            let item = def.collection("items").unwrap();
            assert!(item.property_names().contains(&"isActive"));
        }

        #[test]
        fn test_children() {
            let def = PageDefinition::new("").with_page("list", simple_list_page());
            assert_eq!(def.page("list").unwrap().scope(), "[data-test-simple-list]");
            assert!(def.page("missing").is_none());
            assert!(def.collection("list").is_none());
        }
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn test_valid_tree() {
            assert!(simple_list_page().validate().is_ok());
        }

        #[test]
        fn test_name_clash() {
            let def = PageDefinition::new("div")
                .with_property("items", Property::text())
                .with_collection("items", PageDefinition::new("li"));
            let err = def.validate().unwrap_err();
            assert!(err.is_configuration());
            assert!(err.to_string().contains("'items'"));
        }

        #[test]
        fn test_empty_name() {
            let def = PageDefinition::new("div").with_property(" ", Property::text());
            assert!(def.validate().unwrap_err().is_configuration());
        }

        #[test]
        fn test_collection_needs_scope() {
            let def = PageDefinition::new("div").with_collection("rows", PageDefinition::new(""));
            let err = def.validate().unwrap_err();
            assert!(err.to_string().contains("collection 'rows' needs a scope"));
        }

        #[test]
        fn test_nested_errors_surface() {
            let bad = PageDefinition::new("div").with_collection("rows", PageDefinition::new(""));
            let def = PageDefinition::new("").with_page("inner", bad);
            assert!(def.validate().is_err());
        }
    }

    mod load_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_yaml_matches_builder() {
            let def = PageDefinition::from_yaml(SIMPLE_LIST_YAML).unwrap();
            assert_eq!(def, simple_list_page());
        }

        #[test]
        fn test_json() {
            let def = PageDefinition::from_json(
                r#"{"scope": "ul", "collections": {"rows": {"scope": "li", "properties": {"id": {"attribute": "data-id"}}}}}"#,
            )
            .unwrap();
            let rows = def.collection("rows").unwrap();
            assert_eq!(rows.property("id"), Some(Property::attribute("data-id")));
        }

        #[test]
        fn test_options_section() {
            let def = PageDefinition::from_yaml("scope: ul\noptions:\n  find_one: stop_at_second\n")
                .unwrap();
            assert_eq!(def.options().unwrap().find_one, FindOnePolicy::StopAtSecond);
        }

        #[test]
        fn test_unknown_property_kind_fails_at_load() {
            let yaml = "scope: ul\nproperties:\n  isShiny: { sparkles: yes }\n";
            let err = PageDefinition::from_yaml(yaml).unwrap_err();
            assert!(err.is_configuration());
            assert!(err.to_string().contains("isShiny"));
        }

        #[test]
        fn test_unknown_key_fails() {
            let err = PageDefinition::from_yaml("scope: ul\nwidgets: {}\n").unwrap_err();
            assert!(matches!(err, PageError::Yaml(_)));
        }

        #[test]
        fn test_validation_runs_on_load() {
            let yaml = "collections:\n  rows:\n    properties: {}\n";
            let err = PageDefinition::from_yaml(yaml).unwrap_err();
            assert!(err.is_configuration());
        }

        #[test]
        fn test_from_file_by_extension() {
            let dir = tempfile::TempDir::new().unwrap();

            let yaml_path = dir.path().join("list.yaml");
            std::fs::File::create(&yaml_path)
                .unwrap()
                .write_all(SIMPLE_LIST_YAML.as_bytes())
                .unwrap();
            assert_eq!(PageDefinition::from_file(&yaml_path).unwrap(), simple_list_page());

            let json_path = dir.path().join("list.json");
            std::fs::write(&json_path, r#"{"scope": "ul"}"#).unwrap();
            assert_eq!(PageDefinition::from_file(&json_path).unwrap().scope(), "ul");
        }

        #[test]
        fn test_from_missing_file() {
            let dir = tempfile::TempDir::new().unwrap();
            let err = PageDefinition::from_file(dir.path().join("nope.yaml")).unwrap_err();
            assert!(matches!(err, PageError::Io(_)));
        }
    }
}
