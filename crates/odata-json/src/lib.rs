#![doc = include_str!("../README.md")]

pub mod context_url;
pub mod error;
pub mod model;
pub mod options;
pub mod query;
pub mod sink;
pub mod value;
pub mod write;

pub use crate::error::{Error, Result};
pub use crate::model::{EdmModel, PrimitiveKind, Property, PropertyKind, StructuredType};
pub use crate::options::{MetadataLevel, Options};
pub use crate::query::{PathSegment, QueryShape, SelectExpandTree, SelectItem};
pub use crate::sink::{JsonSink, TextSink};
pub use crate::value::{Resource, ResourceSet, Value};
pub use crate::write::{Cancellation, NoPaging, PagingHooks, ResourceSetWriter};

use crate::write::registry::ValueKind;
use crate::write::resource::ResourceWriter;
use crate::write::session::{Frame, WriterSession};

/// Entry point for serializing payloads against one EDM model.
///
/// Holds the knobs shared by every write (options, paging hooks,
/// cancellation); each write call gets its own session and frame stack,
/// so one writer can serve many sequential payloads.
pub struct ODataWriter<'a> {
    model: &'a EdmModel,
    options: Options,
    hooks: Box<dyn PagingHooks>,
    cancel: Option<Cancellation>,
}

impl<'a> ODataWriter<'a> {
    pub fn new(model: &'a EdmModel) -> Self {
        Self {
            model,
            options: Options::default(),
            hooks: Box::new(NoPaging),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn PagingHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn session(&self) -> WriterSession<'_> {
        WriterSession::new(
            self.model,
            &self.options,
            self.hooks.as_ref(),
            self.cancel.clone(),
        )
    }

    /// Write one resource as a top-level payload. A path that addresses
    /// the resource through a key segment gets the `/$entity` context
    /// suffix.
    pub fn write_resource(
        &self,
        resource: &Resource,
        shape: &QueryShape,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        let mut session = self.session();
        let ty = session
            .model
            .resolve(&resource.type_name)
            .ok_or_else(|| Error::UnknownType(resource.type_name.clone()))?;
        if self.options.metadata >= MetadataLevel::Minimal {
            let suffix = shape
                .path
                .iter()
                .any(PathSegment::is_key)
                .then_some(context_url::ENTITY_SUFFIX);
            let url = context_url::build(
                &shape.service_root,
                &shape.path,
                shape.select_expand.as_ref(),
                shape.has_apply,
                suffix,
            );
            session.set_pending_context(url);
        }
        session.push_frame(Frame {
            ty,
            selection: shape.select_expand.as_ref(),
        });
        let result = ResourceWriter.write_resource(resource, &mut session, sink);
        session.pop_frame();
        result
    }

    /// Write a top-level resource set (envelope, annotations, `"value"`
    /// array).
    pub fn write_resource_set(
        &self,
        set: &ResourceSet,
        shape: &QueryShape,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        self.set_writer().write(set, shape, sink)
    }

    /// The stateful top-level set writer, for callers that want to hold on
    /// to it (and its single-use discipline) directly.
    pub fn set_writer(&self) -> ResourceSetWriter<'_> {
        ResourceSetWriter::new(self.session())
    }

    /// Top-level dispatcher for a generic value. Only structured payloads
    /// are valid at the top level.
    pub fn write_value(
        &self,
        value: &Value,
        shape: &QueryShape,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Resource(resource) => self.write_resource(resource, shape, sink),
            other => Err(Error::UnsupportedPayload(ValueKind::of(other).name())),
        }
    }

    pub fn resource_to_string(&self, resource: &Resource, shape: &QueryShape) -> Result<String> {
        let mut sink = TextSink::new(Vec::new());
        self.write_resource(resource, shape, &mut sink)?;
        bytes_to_string(sink.into_inner())
    }

    pub fn resource_set_to_string(&self, set: &ResourceSet, shape: &QueryShape) -> Result<String> {
        let mut sink = TextSink::new(Vec::new());
        self.write_resource_set(set, shape, &mut sink)?;
        bytes_to_string(sink.into_inner())
    }
}

fn bytes_to_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::Message(e.to_string()))
}
