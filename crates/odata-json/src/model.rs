//! The slice of the entity data model the writers consult. Built once by
//! the host, never mutated by this crate.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    Binary,
    DateTimeOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Primitive(PrimitiveKind),
    Complex { type_name: String },
    Navigation { target: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
    pub collection: bool,
}

impl Property {
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Primitive(kind),
            collection: false,
        }
    }

    pub fn complex(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Complex {
                type_name: type_name.into(),
            },
            collection: false,
        }
    }

    pub fn navigation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Navigation {
                target: target.into(),
            },
            collection: false,
        }
    }

    pub fn as_collection(mut self) -> Self {
        self.collection = true;
        self
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self.kind, PropertyKind::Navigation { .. })
    }

    /// True for complex and navigation properties: the value is itself a
    /// resource (or a collection of them) and gets its own writer frame.
    pub fn is_structured(&self) -> bool {
        matches!(
            self.kind,
            PropertyKind::Complex { .. } | PropertyKind::Navigation { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredType {
    pub name: String,
    open: bool,
    structural: Vec<Property>,
    navigation: Vec<Property>,
}

impl StructuredType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: false,
            structural: Vec::new(),
            navigation: Vec::new(),
        }
    }

    /// Mark the type open: undeclared properties are written as dynamic
    /// values instead of failing the write.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn with_structural(mut self, property: Property) -> Self {
        self.structural.push(property);
        self
    }

    pub fn with_navigation(mut self, property: Property) -> Self {
        self.navigation.push(property);
        self
    }

    /// Structural properties in declaration order.
    pub fn structural_properties(&self) -> &[Property] {
        &self.structural
    }

    /// Navigation properties in declaration order.
    pub fn navigation_properties(&self) -> &[Property] {
        &self.navigation
    }

    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.structural
            .iter()
            .chain(self.navigation.iter())
            .find(|p| p.name == name)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Default)]
pub struct EdmModel {
    types: HashMap<String, StructuredType>,
}

impl EdmModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, ty: StructuredType) -> Self {
        self.add_type(ty);
        self
    }

    pub fn add_type(&mut self, ty: StructuredType) {
        self.types.insert(ty.name.clone(), ty);
    }

    pub fn resolve(&self, type_name: &str) -> Option<&StructuredType> {
        self.types.get(type_name)
    }
}
