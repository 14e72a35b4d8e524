//! Thread-safe job status registry.

use std::collections::HashMap;
use std::sync::RwLock;

use kinema_models::{JobId, JobStatus};

/// Mapping from job id to its current status snapshot.
///
/// `upsert` overwrites the whole record (last-write-wins, no merge);
/// callers supply the full desired record. `upsert` and `get` for a
/// given id are atomic with respect to each other.
#[derive(Default)]
pub struct StatusRegistry {
    records: RwLock<HashMap<JobId, JobStatus>>,
}

impl StatusRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the record for the status's job id.
    pub fn upsert(&self, status: JobStatus) {
        self.records
            .write()
            .unwrap()
            .insert(status.job_id.clone(), status);
    }

    /// Current record for a job id, if one has been enqueued.
    pub fn get(&self, job_id: &JobId) -> Option<JobStatus> {
        self.records.read().unwrap().get(job_id).cloned()
    }
}
