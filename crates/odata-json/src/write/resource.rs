use crate::error::{Error, Result};
use crate::options::MetadataLevel;
use crate::query::{SelectExpandTree, SelectItem};
use crate::sink::JsonSink;
use crate::value::{Resource, Value};
use crate::write::property::{write_dynamic, write_property};
use crate::write::registry::ValueWriter;
use crate::write::session::WriterSession;

/// Writes one structured value as a JSON object: envelope, per-object
/// annotations, then the applicable properties under the active frame's
/// selection.
///
/// Property order on the wire: selected/structural properties always
/// precede expanded navigation properties, whatever order the parser
/// produced the items in. With no selection tree at all, structural
/// properties are written in declaration order and navigation properties
/// are left out; they require an explicit expand.
pub(crate) struct ResourceWriter;

impl ResourceWriter {
    pub(crate) fn write_resource(
        &self,
        resource: &Resource,
        session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        sink.object_start()?;

        if let Some(url) = session.take_pending_context() {
            sink.property_name("@odata.context")?;
            sink.string_value(&url)?;
        }
        if session.options.metadata >= MetadataLevel::Minimal {
            if let Some(etag) = &resource.etag {
                sink.property_name("@odata.etag")?;
                sink.string_value(etag)?;
            }
        }

        let frame = session.current();
        match frame.selection {
            None => {
                for property in frame.ty.structural_properties() {
                    if let Some(value) = resource.property(&property.name) {
                        write_property(session, sink, property, value, None)?;
                    }
                }
            }
            Some(tree) => {
                // Pass 1: selected properties.
                if tree.has_wildcard() {
                    // Explicit path items are subsumed by the wildcard for
                    // emission, but an unresolvable name still fails the
                    // write.
                    for item in &tree.items {
                        if let SelectItem::Path { name, .. } = item {
                            if frame.ty.find_property(name).is_none() && !frame.ty.is_open() {
                                return Err(Error::UndeclaredProperty {
                                    type_name: frame.ty.name.clone(),
                                    property: name.clone(),
                                });
                            }
                        }
                    }
                    for property in frame.ty.structural_properties() {
                        if let Some(value) = resource.property(&property.name) {
                            let nested = tree.nested_for(&property.name);
                            write_property(session, sink, property, value, nested)?;
                        }
                    }
                } else {
                    for item in &tree.items {
                        if let SelectItem::Path { name, nested } = item {
                            self.write_selected(session, sink, resource, name, nested.as_ref())?;
                        }
                    }
                }
                // Pass 2: expanded navigation properties.
                for item in &tree.items {
                    if let SelectItem::Expand { navigation, nested } = item {
                        self.write_expanded(session, sink, resource, navigation, nested.as_ref())?;
                    }
                }
            }
        }

        sink.object_end()
    }

    fn write_selected<'a>(
        &self,
        session: &mut WriterSession<'a>,
        sink: &mut dyn JsonSink,
        resource: &Resource,
        name: &str,
        nested: Option<&'a SelectExpandTree>,
    ) -> Result<()> {
        let frame = session.current();
        match frame.ty.find_property(name) {
            // A selected navigation property without an expand embeds
            // nothing at minimal metadata.
            Some(property) if property.is_navigation() => Ok(()),
            Some(property) => {
                if let Some(value) = resource.property(name) {
                    write_property(session, sink, property, value, nested)?;
                }
                Ok(())
            }
            None if frame.ty.is_open() => {
                if let Some(value) = resource.property(name) {
                    write_dynamic(session, sink, name, value)?;
                }
                Ok(())
            }
            None => Err(Error::UndeclaredProperty {
                type_name: frame.ty.name.clone(),
                property: name.to_string(),
            }),
        }
    }

    fn write_expanded<'a>(
        &self,
        session: &mut WriterSession<'a>,
        sink: &mut dyn JsonSink,
        resource: &Resource,
        navigation: &str,
        nested: Option<&'a SelectExpandTree>,
    ) -> Result<()> {
        let frame = session.current();
        match frame.ty.find_property(navigation) {
            Some(property) if property.is_navigation() => {
                if let Some(value) = resource.property(navigation) {
                    write_property(session, sink, property, value, nested)?;
                }
                Ok(())
            }
            Some(_) => Err(Error::Message(format!(
                "'{}' on '{}' is not a navigation property",
                navigation, frame.ty.name
            ))),
            None if frame.ty.is_open() => {
                if let Some(value) = resource.property(navigation) {
                    write_dynamic(session, sink, navigation, value)?;
                }
                Ok(())
            }
            None => Err(Error::UndeclaredProperty {
                type_name: frame.ty.name.clone(),
                property: navigation.to_string(),
            }),
        }
    }
}

impl ValueWriter for ResourceWriter {
    fn write(
        &self,
        value: &Value,
        session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Resource(resource) => self.write_resource(resource, session, sink),
            other => Err(Error::Message(format!(
                "resource writer received a {} value",
                crate::write::registry::ValueKind::of(other).name()
            ))),
        }
    }
}
