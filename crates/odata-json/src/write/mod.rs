//! The streaming writer pipeline: an explicit frame stack scoping the
//! select/expand tree to each nesting level, a type-keyed registry of
//! value writers, and the resource / property / resource-set writers
//! that walk the payload graph.

pub(crate) mod primitives;
pub(crate) mod property;
pub(crate) mod registry;
pub(crate) mod resource;
pub(crate) mod resource_set;
pub(crate) mod session;

pub use property::{NoPaging, PagingHooks};
pub use resource_set::ResourceSetWriter;
pub use session::Cancellation;
