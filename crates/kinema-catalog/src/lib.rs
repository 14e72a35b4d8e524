//! Metadata repository for asset records and title durations.
//!
//! The pipelines persist their outputs through the narrow
//! [`CatalogRepository`] trait. The in-memory backend is the default for
//! tests and local development; a database-backed implementation plugs in
//! at the same seam.

pub mod error;
pub mod memory;
pub mod repository;

pub use error::{CatalogError, CatalogResult};
pub use memory::MemoryCatalog;
pub use repository::CatalogRepository;

#[cfg(feature = "mocks")]
pub use repository::MockCatalogRepository;
