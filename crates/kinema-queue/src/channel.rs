//! FIFO job channel with cancellable blocking dequeue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::{watch, Notify};
use tracing::debug;

use kinema_models::{JobId, JobStatus};

use crate::error::{QueueError, QueueResult};
use crate::registry::StatusRegistry;

/// A descriptor that can travel through a [`JobChannel`].
pub trait QueueJob: Send + 'static {
    /// The job's unique id.
    fn job_id(&self) -> &JobId;
}

impl QueueJob for kinema_models::TranscodeJob {
    fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl QueueJob for kinema_models::SubtitleJob {
    fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

/// Unbounded FIFO of job descriptors for one job kind.
///
/// Enqueue atomically stores the descriptor and seeds the initial Queued
/// status in the shared registry, so a status record exists exactly when
/// a job with that id has been enqueued. Workers dequeue one descriptor
/// at a time; the queue never hands the same instance to two consumers.
pub struct JobChannel<J> {
    queue: Mutex<VecDeque<J>>,
    notify: Notify,
    registry: Arc<StatusRegistry>,
}

impl<J: QueueJob> JobChannel<J> {
    /// Create an empty channel seeding statuses into the given registry.
    pub fn new(registry: Arc<StatusRegistry>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            registry,
        }
    }

    /// Queue a job and seed its `{Queued, progress: 0}` status record.
    pub fn enqueue(&self, job: J) -> JobId {
        let job_id = job.job_id().clone();

        {
            let mut queue = self.queue.lock().unwrap();
            self.registry.upsert(JobStatus::queued(job_id.clone()));
            queue.push_back(job);
        }

        debug!("Enqueued job {}", job_id);
        self.notify.notify_one();
        job_id
    }

    /// Block until a job is available or shutdown is signalled.
    pub async fn dequeue(&self, shutdown: &mut watch::Receiver<bool>) -> QueueResult<J> {
        loop {
            if *shutdown.borrow() {
                return Err(QueueError::Cancelled);
            }

            // Register for wakeup before checking the queue, so a job
            // enqueued between the check and the await is not missed.
            let notified = self.notify.notified();

            if let Some(job) = self.queue.lock().unwrap().pop_front() {
                return Ok(job);
            }

            tokio::select! {
                _ = notified => {}
                _ = shutdown.changed() => {}
            }
        }
    }

    /// Number of jobs currently waiting.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Whether no jobs are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The registry this channel seeds statuses into.
    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_models::{JobState, TranscodeJob};
    use std::time::Duration;

    fn job(movie_id: &str) -> TranscodeJob {
        TranscodeJob::new("uploads", format!("raw/{}.mkv", movie_id), movie_id, "en")
    }

    #[tokio::test]
    async fn enqueue_seeds_queued_status() {
        let registry = Arc::new(StatusRegistry::new());
        let channel = JobChannel::new(Arc::clone(&registry));

        let job_id = channel.enqueue(job("42"));

        let status = registry.get(&job_id).expect("status exists after enqueue");
        assert_eq!(status.state, JobState::Queued);
        assert_eq!(status.progress, 0);
    }

    #[tokio::test]
    async fn jobs_are_dequeued_in_fifo_order() {
        let registry = Arc::new(StatusRegistry::new());
        let channel = JobChannel::new(registry);
        let (_tx, mut shutdown) = watch::channel(false);

        let first = channel.enqueue(job("1"));
        let second = channel.enqueue(job("2"));

        assert_eq!(channel.dequeue(&mut shutdown).await.unwrap().job_id, first);
        assert_eq!(channel.dequeue(&mut shutdown).await.unwrap().job_id, second);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn dequeue_blocks_until_a_job_arrives() {
        let registry = Arc::new(StatusRegistry::new());
        let channel = Arc::new(JobChannel::new(registry));
        let (_tx, mut shutdown) = watch::channel(false);

        let waiter = Arc::clone(&channel);
        let handle = tokio::spawn(async move { waiter.dequeue(&mut shutdown).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let job_id = channel.enqueue(job("42"));

        let dequeued = handle.await.unwrap().unwrap();
        assert_eq!(dequeued.job_id, job_id);
    }

    #[tokio::test]
    async fn shutdown_cancels_a_blocked_dequeue() {
        let registry = Arc::new(StatusRegistry::new());
        let channel = Arc::new(JobChannel::<TranscodeJob>::new(registry));
        let (tx, mut shutdown) = watch::channel(false);

        let waiter = Arc::clone(&channel);
        let handle = tokio::spawn(async move { waiter.dequeue(&mut shutdown).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(QueueError::Cancelled)));
    }
}
