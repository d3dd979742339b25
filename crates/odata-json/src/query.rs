//! The parsed query shape the writers consume. Produced by a URI parser
//! elsewhere; immutable for the duration of one write.

/// One segment of the resource path, in request order.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    EntitySet(String),
    Singleton(String),
    /// A key literal, already rendered (`5`, `'ALFKI'` without the
    /// wrapping parentheses).
    Key(String),
    Property(String),
    Navigation(String),
}

impl PathSegment {
    pub fn identifier(&self) -> &str {
        match self {
            PathSegment::EntitySet(name)
            | PathSegment::Singleton(name)
            | PathSegment::Key(name)
            | PathSegment::Property(name)
            | PathSegment::Navigation(name) => name,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self, PathSegment::Key(_))
    }
}

/// One item of a `$select`/`$expand` tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// A selected property path, optionally carrying a nested sub-tree
    /// (select inside a complex property).
    Path {
        name: String,
        nested: Option<SelectExpandTree>,
    },
    /// An expanded navigation property with its own sub-tree.
    Expand {
        navigation: String,
        nested: Option<SelectExpandTree>,
    },
    /// `$select=*`.
    Wildcard,
}

impl SelectItem {
    pub fn path(name: impl Into<String>) -> Self {
        SelectItem::Path {
            name: name.into(),
            nested: None,
        }
    }

    pub fn path_with(name: impl Into<String>, nested: SelectExpandTree) -> Self {
        SelectItem::Path {
            name: name.into(),
            nested: Some(nested),
        }
    }

    pub fn expand(navigation: impl Into<String>) -> Self {
        SelectItem::Expand {
            navigation: navigation.into(),
            nested: None,
        }
    }

    pub fn expand_with(navigation: impl Into<String>, nested: SelectExpandTree) -> Self {
        SelectItem::Expand {
            navigation: navigation.into(),
            nested: Some(nested),
        }
    }
}

/// A level of the selection/expansion shape.
///
/// "Everything selected" is an *absent* tree (`Option::None` at the use
/// site); an empty tree selects nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectExpandTree {
    pub items: Vec<SelectItem>,
}

impl SelectExpandTree {
    pub fn new(items: Vec<SelectItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_wildcard(&self) -> bool {
        self.items.iter().any(|i| matches!(i, SelectItem::Wildcard))
    }

    /// Nested sub-tree attached to a path select of the given name.
    pub fn nested_for(&self, name: &str) -> Option<&SelectExpandTree> {
        self.items.iter().find_map(|item| match item {
            SelectItem::Path { name: n, nested } if n == name => nested.as_ref(),
            _ => None,
        })
    }
}

/// Everything the writers need to know about the request.
#[derive(Debug, Clone)]
pub struct QueryShape {
    /// Absolute base URI of the service.
    pub service_root: String,
    pub path: Vec<PathSegment>,
    pub select_expand: Option<SelectExpandTree>,
    pub has_apply: bool,
    pub count_requested: bool,
}

impl QueryShape {
    pub fn new(service_root: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            service_root: service_root.into(),
            path,
            select_expand: None,
            has_apply: false,
            count_requested: false,
        }
    }

    pub fn with_select_expand(mut self, tree: SelectExpandTree) -> Self {
        self.select_expand = Some(tree);
        self
    }

    pub fn with_apply(mut self) -> Self {
        self.has_apply = true;
        self
    }

    pub fn with_count(mut self) -> Self {
        self.count_requested = true;
        self
    }
}
