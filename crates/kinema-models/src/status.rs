//! Job status snapshots for progress tracking and polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// Job processing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job is waiting in the queue
    #[default]
    Queued,
    /// Job is actively being processed
    Running,
    /// Job completed successfully
    Done,
    /// Job failed with an error
    Failed,
}

impl JobState {
    /// Get string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a job's progress and outcome, keyed by job id.
///
/// The registry stores full records with last-write-wins semantics, so
/// every mutation here produces the complete desired record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    /// Unique job identifier
    pub job_id: JobId,
    /// Current state
    pub state: JobState,
    /// Progress percentage (0-100); pinned to 100 on Done
    pub progress: u8,
    /// Result object key, set only when Done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_key: Option<String>,
    /// Error message, set only when Failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the status was last updated
    pub updated_at: DateTime<Utc>,
}

impl JobStatus {
    /// Create the initial Queued record for a freshly enqueued job.
    pub fn queued(job_id: JobId) -> Self {
        Self {
            job_id,
            state: JobState::Queued,
            progress: 0,
            result_key: None,
            error_message: None,
            updated_at: Utc::now(),
        }
    }

    /// Record for a job that has started running.
    pub fn running(job_id: JobId, progress: u8) -> Self {
        Self {
            job_id,
            state: JobState::Running,
            // Progress is capped below 100 until the terminal Done write.
            progress: progress.min(99),
            result_key: None,
            error_message: None,
            updated_at: Utc::now(),
        }
    }

    /// Terminal Done record carrying the result key.
    pub fn done(job_id: JobId, result_key: impl Into<String>) -> Self {
        Self {
            job_id,
            state: JobState::Done,
            progress: 100,
            result_key: Some(result_key.into()),
            error_message: None,
            updated_at: Utc::now(),
        }
    }

    /// Terminal Failed record carrying an error message.
    pub fn failed(job_id: JobId, error: impl Into<String>) -> Self {
        Self {
            job_id,
            state: JobState::Failed,
            progress: 0,
            result_key: None,
            error_message: Some(error.into()),
            updated_at: Utc::now(),
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
