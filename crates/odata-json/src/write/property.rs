use crate::error::{Error, Result};
use crate::model::{Property, PropertyKind};
use crate::query::SelectExpandTree;
use crate::sink::JsonSink;
use crate::value::Value;
use crate::write::registry::dispatch;
use crate::write::session::{Frame, WriterSession};

/// Extension seam for streamed/paged nested collections. Both hooks run
/// immediately before the property name goes out and default to no-ops.
pub trait PagingHooks {
    /// Total count for a nested collection property, emitted as
    /// `<name>@odata.count`.
    fn collection_count(&self, property: &str) -> Option<i64> {
        let _ = property;
        None
    }

    /// Next page link for a nested collection property, emitted as
    /// `<name>@odata.nextLink`.
    fn collection_next_link(&self, property: &str) -> Option<String> {
        let _ = property;
        None
    }
}

/// The default: no nested paging.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaging;

impl PagingHooks for NoPaging {}

/// Write one declared `"name":value` pair. Structured values get a frame
/// pushed for the duration of the nested write; nested complex values
/// default to "all selected" unless a sub-tree was supplied.
pub(crate) fn write_property<'a>(
    session: &mut WriterSession<'a>,
    sink: &mut dyn JsonSink,
    property: &Property,
    value: &Value,
    nested: Option<&'a SelectExpandTree>,
) -> Result<()> {
    if property.collection {
        let hooks = session.hooks;
        if let Some(count) = hooks.collection_count(&property.name) {
            sink.property_name(&format!("{}@odata.count", property.name))?;
            sink.int64_value(count)?;
        }
        if let Some(link) = hooks.collection_next_link(&property.name) {
            sink.property_name(&format!("{}@odata.nextLink", property.name))?;
            sink.string_value(&link)?;
        }
    }

    sink.property_name(&property.name)?;

    match &property.kind {
        PropertyKind::Primitive(_) => dispatch(session, sink, value),
        PropertyKind::Complex { type_name } | PropertyKind::Navigation { target: type_name } => {
            let mut ty = session
                .model
                .resolve(type_name)
                .ok_or_else(|| Error::UnknownType(type_name.clone()))?;
            // A value of a derived type overrides the declared target.
            if let Value::Resource(resource) = value {
                if resource.type_name != *type_name {
                    ty = session
                        .model
                        .resolve(&resource.type_name)
                        .ok_or_else(|| Error::UnknownType(resource.type_name.clone()))?;
                }
            }
            session.push_frame(Frame {
                ty,
                selection: nested,
            });
            let result = dispatch(session, sink, value);
            session.pop_frame();
            result
        }
    }
}

/// Write a dynamic (undeclared, open-type) `"name":value` pair. Structured
/// values are framed by their own declared type name with everything
/// selected.
pub(crate) fn write_dynamic(
    session: &mut WriterSession<'_>,
    sink: &mut dyn JsonSink,
    name: &str,
    value: &Value,
) -> Result<()> {
    sink.property_name(name)?;
    if let Value::Resource(resource) = value {
        let ty = session
            .model
            .resolve(&resource.type_name)
            .ok_or_else(|| Error::UnknownType(resource.type_name.clone()))?;
        session.push_frame(Frame {
            ty,
            selection: None,
        });
        let result = dispatch(session, sink, value);
        session.pop_frame();
        return result;
    }
    dispatch(session, sink, value)
}
