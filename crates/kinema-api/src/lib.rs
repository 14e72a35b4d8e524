//! HTTP surface of the encoding backend.
//!
//! Three thin admin endpoints: enqueue a transcode, enqueue a subtitle
//! upload, poll a job's status. The worker loops run in the same process
//! and drain the channels this crate enqueues into.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
