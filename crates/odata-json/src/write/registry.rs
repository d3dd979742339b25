use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::sink::JsonSink;
use crate::value::Value;
use crate::write::primitives::{
    BinaryWriter, BooleanWriter, DateTimeOffsetWriter, DecimalWriter, DoubleWriter, Int32Writer,
    Int64Writer, NullWriter, StringWriter,
};
use crate::write::resource::ResourceWriter;
use crate::write::resource_set::CollectionWriter;
use crate::write::session::WriterSession;

/// The encodable shape of a value; the registry's cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKind {
    Null,
    Boolean,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    Binary,
    DateTimeOffset,
    Resource,
    Collection,
}

impl ValueKind {
    pub(crate) fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Double(_) => ValueKind::Double,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::String(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::DateTimeOffset(_) => ValueKind::DateTimeOffset,
            Value::Resource(_) => ValueKind::Resource,
            Value::Collection(_) => ValueKind::Collection,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::Double => "double",
            ValueKind::Decimal => "decimal",
            ValueKind::String => "string",
            ValueKind::Binary => "binary",
            ValueKind::DateTimeOffset => "datetimeoffset",
            ValueKind::Resource => "resource",
            ValueKind::Collection => "collection",
        }
    }
}

/// A writer capable of encoding one value shape, given the active frame
/// and session. Writers for different shapes are mutually opaque.
pub(crate) trait ValueWriter: Send + Sync {
    fn write(
        &self,
        value: &Value,
        session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()>;
}

/// Kind-keyed writer cache: each writer is constructed on first use and
/// memoized. Shared handles let a resolved writer run while the session
/// is mutably borrowed.
pub(crate) struct WriterRegistry {
    writers: HashMap<ValueKind, Arc<dyn ValueWriter>>,
}

impl WriterRegistry {
    pub(crate) fn new() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    pub(crate) fn resolve(&mut self, kind: ValueKind) -> Arc<dyn ValueWriter> {
        if let Some(writer) = self.writers.get(&kind) {
            return Arc::clone(writer);
        }
        let writer = construct(kind);
        self.writers.insert(kind, Arc::clone(&writer));
        writer
    }
}

fn construct(kind: ValueKind) -> Arc<dyn ValueWriter> {
    match kind {
        ValueKind::Null => Arc::new(NullWriter),
        ValueKind::Boolean => Arc::new(BooleanWriter),
        ValueKind::Int32 => Arc::new(Int32Writer),
        ValueKind::Int64 => Arc::new(Int64Writer),
        ValueKind::Double => Arc::new(DoubleWriter),
        ValueKind::Decimal => Arc::new(DecimalWriter),
        ValueKind::String => Arc::new(StringWriter),
        ValueKind::Binary => Arc::new(BinaryWriter),
        ValueKind::DateTimeOffset => Arc::new(DateTimeOffsetWriter),
        ValueKind::Resource => Arc::new(ResourceWriter),
        ValueKind::Collection => Arc::new(CollectionWriter),
    }
}

/// Resolve the writer for a value's shape and run it.
pub(crate) fn dispatch(
    session: &mut WriterSession<'_>,
    sink: &mut dyn JsonSink,
    value: &Value,
) -> Result<()> {
    let writer = session.writers.resolve(ValueKind::of(value));
    writer.write(value, session, sink)
}
