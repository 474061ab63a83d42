//! Component categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six categories a named component can be registered under.
///
/// The tag of each category doubles as a reserved `type` value in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Handler,
    Divider,
    Layer,
    LayerCenter,
    HandlerGroup,
    AsyncHandlerGroup,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Handler,
        Category::Divider,
        Category::Layer,
        Category::LayerCenter,
        Category::HandlerGroup,
        Category::AsyncHandlerGroup,
    ];

    /// The reserved tag for this category.
    pub const fn tag(&self) -> &'static str {
        match self {
            Category::Handler => "Handler",
            Category::Divider => "Divider",
            Category::Layer => "Layer",
            Category::LayerCenter => "LayerCenter",
            Category::HandlerGroup => "HandlerGroup",
            Category::AsyncHandlerGroup => "AsyncHandlerGroup",
        }
    }

    /// Parse a reserved tag. Returns `None` for concrete type names.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
