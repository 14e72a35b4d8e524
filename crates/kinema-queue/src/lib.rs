//! In-process job queue and status registry.
//!
//! Both structures live in process memory only: a restart loses queued
//! and in-flight jobs. That is a documented limitation of this backend,
//! not something the API masks. A durable queue can replace
//! [`JobChannel`] behind the same enqueue/dequeue surface.

pub mod channel;
pub mod error;
pub mod registry;

pub use channel::{JobChannel, QueueJob};
pub use error::{QueueError, QueueResult};
pub use registry::StatusRegistry;
