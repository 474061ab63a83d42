//! Naming-convention dispatch.
//!
//! A name that no configuration file declares is mapped to a category by its
//! suffix (or, for handler groups, its prefix). Rules are checked in order,
//! most specific first: `BillingAsyncHandlerGroup` must never be taken for a
//! plain handler.

use layerflow_protocols::Category;

type Predicate = fn(&str) -> bool;

fn is_async_handler_group(name: &str) -> bool {
    name.ends_with(Category::AsyncHandlerGroup.tag())
}

fn is_handler_group(name: &str) -> bool {
    name.starts_with(Category::HandlerGroup.tag())
}

fn is_divider(name: &str) -> bool {
    name.ends_with(Category::Divider.tag())
}

fn is_handler(name: &str) -> bool {
    name.ends_with(Category::Handler.tag())
}

fn is_layer(name: &str) -> bool {
    name.ends_with(Category::Layer.tag())
}

fn is_layer_center(name: &str) -> bool {
    name.ends_with(Category::LayerCenter.tag())
}

/// Ordered dispatch table.
pub static RULES: [(Predicate, Category); 6] = [
    (is_async_handler_group, Category::AsyncHandlerGroup),
    (is_handler_group, Category::HandlerGroup),
    (is_divider, Category::Divider),
    (is_handler, Category::Handler),
    (is_layer, Category::Layer),
    (is_layer_center, Category::LayerCenter),
];

/// Category the first matching rule assigns to `name`.
pub fn category_for(name: &str) -> Option<Category> {
    RULES
        .iter()
        .find(|(matches, _)| matches(name))
        .map(|(_, category)| *category)
}
