use chrono::{DateTime, FixedOffset};

/// One encodable value of the in-memory payload model.
///
/// `Decimal` carries its textual form so arbitrary-precision values survive
/// the trip; the sink validates the literal at write time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal(String),
    String(String),
    Binary(Vec<u8>),
    DateTimeOffset(DateTime<FixedOffset>),
    Resource(Resource),
    /// A nested collection, primitive or structured. Top-level sequences
    /// travel as [`ResourceSet`] instead.
    Collection(Vec<Value>),
}

impl Value {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Resource(_) | Value::Collection(_))
    }
}

/// One structured value: an entity or a complex-typed instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    /// Name of the EDM structured type describing this value.
    pub type_name: String,
    pub etag: Option<String>,
    /// Property values in the order the producer supplied them. Emission
    /// order is decided by the writers, not by this list.
    pub properties: Vec<(String, Value)>,
}

impl Resource {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            etag: None,
            properties: Vec::new(),
        }
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.push((name.into(), value));
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// A top-level sequence of resources plus its paging facts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceSet {
    pub resources: Vec<Resource>,
    /// Total count across all pages, when known. Falls back to the
    /// in-memory length when `$count` was requested without it.
    pub count: Option<i64>,
    pub next_link: Option<String>,
}

impl ResourceSet {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            count: None,
            next_link: None,
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_next_link(mut self, link: impl Into<String>) -> Self {
        self.next_link = Some(link.into());
        self
    }
}
