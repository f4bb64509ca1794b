use std::{
    collections::HashMap,
    sync::Mutex,
};

use chrono::{NaiveDateTime, Utc};
use rand::RngCore;

/// Lifecycle of a migration job. Submission goes straight to `Running`
/// (never `Queued`) so a status poll can never show an indefinitely
/// queued job; `Queued` exists for stores that do defer execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Finished,
    Error,
    Stalled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Error => "error",
            Self::Stalled => "stalled",
        }
    }
}

#[derive(Clone, Debug)]
pub struct MigrationJob {
    pub id: String,
    pub status: JobStatus,
    pub message: Option<String>,
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}

/// Job-state service interface: submit, read, complete, and unilaterally
/// mark stalled. Kept behind a trait so a durable table-backed store can
/// replace the in-memory one without touching callers.
pub trait JobStore: Send + Sync {
    fn submit(&self) -> MigrationJob;
    fn get(&self, id: &str) -> Option<MigrationJob>;
    fn finish(&self, id: &str, message: String);
    fn fail(&self, id: &str, message: String);
    /// Transition running -> stalled. Informational only; the worker task
    /// is not interrupted. Returns the updated job if it was running.
    fn mark_stalled(&self, id: &str) -> Option<MigrationJob>;
}

/// Process-lifetime job store: a mutex-guarded map. History dies with the
/// process.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<String, MigrationJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_job_id() -> String {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl JobStore for InMemoryJobStore {
    fn submit(&self) -> MigrationJob {
        let job = MigrationJob {
            id: Self::new_job_id(),
            status: JobStatus::Running,
            message: None,
            started_at: Utc::now().naive_utc(),
            finished_at: None,
        };

        self.jobs
            .lock()
            .expect("job map poisoned")
            .insert(job.id.clone(), job.clone());

        job
    }

    fn get(&self, id: &str) -> Option<MigrationJob> {
        self.jobs.lock().expect("job map poisoned").get(id).cloned()
    }

    fn finish(&self, id: &str, message: String) {
        let mut jobs = self.jobs.lock().expect("job map poisoned");
        if let Some(job) = jobs.get_mut(id) {
            job.status = JobStatus::Finished;
            job.message = Some(message);
            job.finished_at = Some(Utc::now().naive_utc());
        }
    }

    fn fail(&self, id: &str, message: String) {
        let mut jobs = self.jobs.lock().expect("job map poisoned");
        if let Some(job) = jobs.get_mut(id) {
            job.status = JobStatus::Error;
            job.message = Some(message);
            job.finished_at = Some(Utc::now().naive_utc());
        }
    }

    fn mark_stalled(&self, id: &str) -> Option<MigrationJob> {
        let mut jobs = self.jobs.lock().expect("job map poisoned");
        let job = jobs.get_mut(id)?;

        if job.status != JobStatus::Running {
            return None;
        }

        job.status = JobStatus::Stalled;
        job.message = Some("Job exceeded the staleness threshold".to_string());
        Some(job.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryJobStore, JobStatus, JobStore};

    /// Jobs start running and ids are unique
    #[test]
    fn submit_starts_running() {
        let store = InMemoryJobStore::new();

        let a = store.submit();
        let b = store.submit();

        assert_eq!(a.status, JobStatus::Running);
        assert_ne!(a.id, b.id);
        assert!(store.get(&a.id).is_some());
        assert!(store.get("unknown").is_none());
    }

    /// Stalling only applies to running jobs
    #[test]
    fn mark_stalled_ignores_finished_jobs() {
        let store = InMemoryJobStore::new();

        let job = store.submit();
        store.finish(&job.id, "done".to_string());

        assert!(store.mark_stalled(&job.id).is_none());
        assert_eq!(store.get(&job.id).unwrap().status, JobStatus::Finished);

        let running = store.submit();
        let stalled = store.mark_stalled(&running.id).unwrap();
        assert_eq!(stalled.status, JobStatus::Stalled);
    }
}
