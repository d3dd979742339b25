use crate::context_url;
use crate::error::{Error, Result};
use crate::options::MetadataLevel;
use crate::query::QueryShape;
use crate::sink::JsonSink;
use crate::value::{ResourceSet, Value};
use crate::write::registry::{ValueKind, ValueWriter, dispatch};
use crate::write::resource::ResourceWriter;
use crate::write::session::{Frame, WriterSession};

/// Writes a nested collection value: array only, no envelope. Each element
/// gets its own frame carrying the element type and the collection frame's
/// selection sub-tree; cancellation is checked between elements.
pub(crate) struct CollectionWriter;

impl ValueWriter for CollectionWriter {
    fn write(
        &self,
        value: &Value,
        session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        let Value::Collection(items) = value else {
            return Err(Error::Message(format!(
                "collection writer received a {} value",
                ValueKind::of(value).name()
            )));
        };
        sink.array_start()?;
        for item in items {
            session.check_cancelled()?;
            let frame = match item {
                // An element of a derived type is framed by its own type.
                Value::Resource(resource) => Frame {
                    ty: session
                        .model
                        .resolve(&resource.type_name)
                        .ok_or_else(|| Error::UnknownType(resource.type_name.clone()))?,
                    selection: session.current().selection,
                },
                _ => session.current(),
            };
            session.push_frame(frame);
            let result = dispatch(session, sink, item);
            session.pop_frame();
            result?;
        }
        sink.array_end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetState {
    NotStarted,
    Enveloped,
    Streaming,
    Closed,
}

/// Writes a top-level resource set: object envelope, context annotation,
/// count/next-link annotations, then the `"value"` array.
///
/// The envelope must be complete before the first element goes out, and a
/// writer that has reached `Closed` (or faulted) cannot be reused.
pub struct ResourceSetWriter<'a> {
    session: WriterSession<'a>,
    state: SetState,
}

impl<'a> ResourceSetWriter<'a> {
    pub(crate) fn new(session: WriterSession<'a>) -> Self {
        Self {
            session,
            state: SetState::NotStarted,
        }
    }

    pub fn write(
        &mut self,
        set: &ResourceSet,
        shape: &'a QueryShape,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        if self.state != SetState::NotStarted {
            return Err(Error::WriterClosed);
        }

        sink.object_start()?;
        self.state = SetState::Enveloped;
        if self.session.options.metadata >= MetadataLevel::Minimal {
            let url = context_url::build(
                &shape.service_root,
                &shape.path,
                shape.select_expand.as_ref(),
                shape.has_apply,
                None,
            );
            sink.property_name("@odata.context")?;
            sink.string_value(&url)?;
        }
        if shape.count_requested {
            let total = set.count.unwrap_or(set.resources.len() as i64);
            sink.property_name("@odata.count")?;
            sink.int64_value(total)?;
        }
        if let Some(link) = &set.next_link {
            sink.property_name("@odata.nextLink")?;
            sink.string_value(link)?;
        }
        sink.property_name("value")?;
        sink.array_start()?;
        self.state = SetState::Streaming;
        let writer = ResourceWriter;
        for resource in &set.resources {
            self.session.check_cancelled()?;
            let ty = self
                .session
                .model
                .resolve(&resource.type_name)
                .ok_or_else(|| Error::UnknownType(resource.type_name.clone()))?;
            self.session.push_frame(Frame {
                ty,
                selection: shape.select_expand.as_ref(),
            });
            let result = writer.write_resource(resource, &mut self.session, sink);
            self.session.pop_frame();
            result?;
        }
        sink.array_end()?;
        sink.object_end()?;
        self.state = SetState::Closed;
        Ok(())
    }
}
