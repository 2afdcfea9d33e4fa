//! Per-request execution states and status reporting.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::info;
use wps_common::WpsError;

/// Lifecycle of a single execute request.
///
/// `Received -> Assembling -> Assembled -> Dispatching -> Done`, with
/// `Failed` reachable from `Assembling` and `Dispatching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Received,
    Assembling,
    Assembled,
    Dispatching,
    Done,
    Failed,
}

impl JobStatus {
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Received, Assembling)
                | (Assembling, Assembled)
                | (Assembling, Failed)
                | (Assembled, Dispatching)
                | (Dispatching, Done)
                | (Dispatching, Failed)
        )
    }

    /// Move to `next`, refusing transitions the lifecycle does not allow.
    pub fn advance(self, next: JobStatus) -> Result<JobStatus, WpsError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(WpsError::InternalError(format!(
                "Invalid job transition {} -> {}",
                self, next
            )))
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Received => "received",
            JobStatus::Assembling => "assembling",
            JobStatus::Assembled => "assembled",
            JobStatus::Dispatching => "dispatching",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// A status report for one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    pub percent: u8,
    pub message: String,
}

impl StatusUpdate {
    pub fn received(process: &str) -> Self {
        Self {
            status: JobStatus::Received,
            percent: 0,
            message: format!("{} accepted", process),
        }
    }

    pub fn done() -> Self {
        Self {
            status: JobStatus::Done,
            percent: 100,
            message: "done".to_string(),
        }
    }

    pub fn failed(err: &WpsError) -> Self {
        Self {
            status: JobStatus::Failed,
            percent: 100,
            message: err.to_string(),
        }
    }
}

/// Receives status at entry and at the terminal state of each job.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn report(&self, job_id: &str, update: StatusUpdate);
}

/// Reporter that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

#[async_trait]
impl StatusReporter for LogReporter {
    async fn report(&self, job_id: &str, update: StatusUpdate) {
        info!(
            job_id = %job_id,
            status = %update.status,
            percent = update.percent,
            message = %update.message,
            "Job status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let status = JobStatus::Received
            .advance(JobStatus::Assembling)
            .and_then(|s| s.advance(JobStatus::Assembled))
            .and_then(|s| s.advance(JobStatus::Dispatching))
            .and_then(|s| s.advance(JobStatus::Done))
            .unwrap();
        assert!(status.is_terminal());
    }

    #[test]
    fn test_failure_transitions() {
        assert!(JobStatus::Assembling.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Dispatching.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Received.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Assembled.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(JobStatus::Received.advance(JobStatus::Dispatching).is_err());
        assert!(JobStatus::Done.advance(JobStatus::Received).is_err());
    }

    #[test]
    fn test_failed_update_carries_message() {
        let update = StatusUpdate::failed(&WpsError::CollaboratorFailure("model crashed".into()));
        assert_eq!(update.status, JobStatus::Failed);
        assert!(update.message.contains("model crashed"));
    }
}
