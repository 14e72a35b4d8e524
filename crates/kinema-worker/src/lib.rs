//! Background media workers.
//!
//! Houses the two pipelines of the encoding backend, the HLS encode
//! pipeline and the subtitle pipeline, plus the worker loops that drain
//! their job channels. Pipelines talk to the outside world only through
//! the [`kinema_storage::ObjectStore`] and
//! [`kinema_catalog::CatalogRepository`] traits.

mod cancel;
pub mod config;
pub mod context;
pub mod error;
pub mod loops;
pub mod subtitle;
pub mod transcode;

pub use config::WorkerConfig;
pub use context::PipelineContext;
pub use error::{WorkerError, WorkerResult};
pub use loops::{run_worker_loop, spawn_workers, JobPipeline};
pub use subtitle::SubtitlePipeline;
pub use transcode::TranscodePipeline;
