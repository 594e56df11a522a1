//! Shared markup and definitions for unit tests.

use crate::definition::PageDefinition;
use crate::property::Property;

pub(crate) const SIMPLE_LIST_HTML: &str = r#"
<div data-test-simple-list-wrapper>
  <div data-test-simple-list>
    <p data-test-simple-list-caption>Hello, List!</p>
    <ul>
      <li data-test-simple-list-item data-id="1">Foo</li>
      <li data-test-simple-list-item data-id="2" class="is-active">Bar</li>
      <li data-test-simple-list-item data-id="3">
        Baz
      </li>
    </ul>
  </div>
</div>
"#;

pub(crate) fn simple_list_page() -> PageDefinition {
    PageDefinition::new("[data-test-simple-list]")
        .with_property("caption", Property::text_of("[data-test-simple-list-caption]"))
        .with_collection(
            "items",
            PageDefinition::new("[data-test-simple-list-item]")
                .with_property("isActive", Property::has_class("is-active")),
        )
}
