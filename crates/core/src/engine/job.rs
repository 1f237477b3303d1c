//! Handles to asynchronous engine operations.

use rigup_protocol::JobStatus;
use tokio::sync::oneshot;

/// A handle to one asynchronous engine operation.
///
/// The engine resolves the job through a oneshot channel; [`Job::wait`]
/// blocks until that happens. Waits are unbounded: the engine owns all
/// pacing, and an engine side that goes away without answering resolves
/// the job as [`JobStatus::Failed`].
#[derive(Debug)]
pub struct Job {
    status: JobStatus,
    rx: Option<oneshot::Receiver<JobStatus>>,
}

impl Job {
    /// A job that is already in a terminal state.
    pub fn completed(status: JobStatus) -> Self {
        Self { status, rx: None }
    }

    /// A pending job plus the sender the engine resolves it with.
    pub fn pending() -> (Self, oneshot::Sender<JobStatus>) {
        let (tx, rx) = oneshot::channel();
        let job = Self {
            status: JobStatus::Pending,
            rx: Some(rx),
        };
        (job, tx)
    }

    /// Last observed status. Does not poll the engine.
    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn succeeded(&self) -> bool {
        self.status.succeeded()
    }

    /// Waits for the job to reach a terminal state and returns it.
    ///
    /// Subsequent calls return the same terminal status without waiting.
    pub async fn wait(&mut self) -> JobStatus {
        if let Some(rx) = self.rx.take() {
            self.status = rx.await.unwrap_or(JobStatus::Failed);
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_job_short_circuits() {
        let mut job = Job::completed(JobStatus::Succeeded);
        assert_eq!(job.status(), JobStatus::Succeeded);
        assert_eq!(job.wait().await, JobStatus::Succeeded);
        assert!(job.succeeded());
    }

    #[tokio::test]
    async fn test_pending_job_resolves_with_sent_status() {
        let (mut job, tx) = Job::pending();
        assert_eq!(job.status(), JobStatus::Pending);
        assert!(!job.succeeded());

        tx.send(JobStatus::Failed).unwrap();
        assert_eq!(job.wait().await, JobStatus::Failed);
        assert_eq!(job.status(), JobStatus::Failed);

        // A second wait is a no-op on the resolved status.
        assert_eq!(job.wait().await, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_dropped_sender_fails_the_job() {
        let (mut job, tx) = Job::pending();
        drop(tx);
        assert_eq!(job.wait().await, JobStatus::Failed);
    }
}
