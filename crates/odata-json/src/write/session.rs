use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::model::{EdmModel, StructuredType};
use crate::options::Options;
use crate::query::SelectExpandTree;
use crate::write::property::PagingHooks;
use crate::write::registry::WriterRegistry;

/// Cooperative cancellation handle. Cloned handles share one flag; the
/// session checks it between element writes and stops issuing output once
/// it trips. Bytes already flushed are not retracted.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One nesting level of the value being written: the structured type in
/// scope and the select/expand sub-tree applicable at this depth. `None`
/// selection means everything is selected.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'a> {
    pub ty: &'a StructuredType,
    pub selection: Option<&'a SelectExpandTree>,
}

/// Mutable state of one top-level write: the frame stack, the writer
/// cache, and the knobs shared by every writer on the way down. Created
/// per write call, discarded when it completes or faults.
pub(crate) struct WriterSession<'a> {
    pub(crate) model: &'a EdmModel,
    pub(crate) options: &'a Options,
    pub(crate) hooks: &'a dyn PagingHooks,
    pub(crate) writers: WriterRegistry,
    frames: SmallVec<[Frame<'a>; 8]>,
    cancel: Option<Cancellation>,
    pending_context: Option<String>,
}

impl<'a> WriterSession<'a> {
    pub(crate) fn new(
        model: &'a EdmModel,
        options: &'a Options,
        hooks: &'a dyn PagingHooks,
        cancel: Option<Cancellation>,
    ) -> Self {
        Self {
            model,
            options,
            hooks,
            writers: WriterRegistry::new(),
            frames: SmallVec::new(),
            cancel,
            pending_context: None,
        }
    }

    pub(crate) fn push_frame(&mut self, frame: Frame<'a>) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) {
        let popped = self.frames.pop();
        debug_assert!(popped.is_some(), "frame stack underflow");
    }

    /// The frame describing the value currently being encoded. Writers are
    /// only ever dispatched with a frame in place.
    pub(crate) fn current(&self) -> Frame<'a> {
        *self
            .frames
            .last()
            .expect("writer invoked without an active frame")
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(c) if c.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Stash a context URL for the next object envelope. Used by top-level
    /// single-resource writes, where the annotation belongs inside the
    /// object the resource writer opens.
    pub(crate) fn set_pending_context(&mut self, url: String) {
        self.pending_context = Some(url);
    }

    pub(crate) fn take_pending_context(&mut self) -> Option<String> {
        self.pending_context.take()
    }
}
