//! Tracking of active and recently finished jobs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

use name_process::{JobStatus, StatusReporter, StatusUpdate};

/// A job that has not reached a terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveJob {
    pub id: String,
    pub process: String,
    pub started_at: DateTime<Utc>,
    pub status: JobStatus,
    pub message: String,
}

/// A job that finished, successfully or not.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedJob {
    pub id: String,
    pub process: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub status: JobStatus,
    pub percent: u8,
    pub message: String,
}

/// Response for /jobs endpoint.
#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub active: Vec<ActiveJob>,
    pub recent: Vec<CompletedJob>,
    pub total_completed: usize,
}

/// Keeps active jobs and a bounded history of completed ones.
pub struct JobTracker {
    active: Mutex<HashMap<String, ActiveJob>>,
    completed: Mutex<VecDeque<CompletedJob>>,
    max_completed: usize,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new(100)
    }
}

impl JobTracker {
    pub fn new(max_completed: usize) -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
            completed: Mutex::new(VecDeque::new()),
            max_completed,
        }
    }

    /// Register a job before it is executed.
    pub async fn start(&self, id: &str, process: &str) {
        let job = ActiveJob {
            id: id.to_string(),
            process: process.to_string(),
            started_at: Utc::now(),
            status: JobStatus::Received,
            message: String::new(),
        };
        self.active.lock().await.insert(id.to_string(), job);
    }

    async fn complete(&self, id: &str, update: StatusUpdate) {
        let mut active = self.active.lock().await;
        if let Some(job) = active.remove(id) {
            let completed_at = Utc::now();
            let duration_ms = (completed_at - job.started_at).num_milliseconds().max(0) as u64;

            let completed = CompletedJob {
                id: job.id,
                process: job.process,
                started_at: job.started_at,
                completed_at,
                duration_ms,
                status: update.status,
                percent: update.percent,
                message: update.message,
            };

            let mut completed_list = self.completed.lock().await;
            completed_list.push_front(completed);

            // Keep only recent entries
            while completed_list.len() > self.max_completed {
                completed_list.pop_back();
            }
        }
    }

    pub async fn get_status(&self) -> JobsResponse {
        let active = self.active.lock().await;
        let completed = self.completed.lock().await;

        JobsResponse {
            active: active.values().cloned().collect(),
            recent: completed.iter().take(20).cloned().collect(),
            total_completed: completed.len(),
        }
    }
}

#[async_trait]
impl StatusReporter for JobTracker {
    async fn report(&self, job_id: &str, update: StatusUpdate) {
        if update.status.is_terminal() {
            self.complete(job_id, update).await;
            return;
        }

        if let Some(job) = self.active.lock().await.get_mut(job_id) {
            job.status = update.status;
            job.message = update.message;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wps_common::WpsError;

    #[tokio::test]
    async fn test_start_creates_active_entry() {
        let tracker = JobTracker::default();
        tracker.start("a", "runname").await;
        tracker.report("a", StatusUpdate::received("runname")).await;

        let status = tracker.get_status().await;
        assert_eq!(status.active.len(), 1);
        assert_eq!(status.active[0].message, "runname accepted");
        assert_eq!(status.total_completed, 0);
    }

    #[tokio::test]
    async fn test_terminal_report_moves_to_completed() {
        let tracker = JobTracker::default();
        tracker.start("a", "runname").await;
        tracker.report("a", StatusUpdate::done()).await;
        tracker.start("b", "runname").await;
        tracker
            .report(
                "b",
                StatusUpdate::failed(&WpsError::CollaboratorFailure("boom".into())),
            )
            .await;

        let status = tracker.get_status().await;
        assert!(status.active.is_empty());
        assert_eq!(status.total_completed, 2);
        assert_eq!(status.recent[0].id, "b");
        assert_eq!(status.recent[0].status, JobStatus::Failed);
        assert_eq!(status.recent[1].status, JobStatus::Done);
        assert_eq!(status.recent[1].percent, 100);
    }

    #[tokio::test]
    async fn test_max_completed_enforced() {
        let tracker = JobTracker::new(3);
        for i in 0..5 {
            let id = i.to_string();
            tracker.start(&id, "runname").await;
            tracker.report(&id, StatusUpdate::done()).await;
        }

        let status = tracker.get_status().await;
        assert_eq!(status.total_completed, 3);
        assert_eq!(status.recent[0].id, "4");
    }
}
