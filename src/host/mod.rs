//! Host integration: the page-level owner of game instances
//!
//! The registry is the factory that turns activity records into running
//! games; completion signals flow out through a `CompletionSink`.

pub mod registry;
pub mod sink;

pub use registry::{GameInstance, InstanceEntry, InstanceRegistry};
pub use sink::CompletionQueue;
