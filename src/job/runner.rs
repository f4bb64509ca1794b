use std::path::PathBuf;

use chrono::{Duration, Utc};

use crate::{
    error::Error,
    job::store::{JobStatus, MigrationJob},
    model::{app::AppState, push::PushMessage},
    service::migrate::import::ImportService,
};

fn archive_path(job_id: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scoutsync-import-{}.zip", job_id))
}

fn notify_job_status(state: &AppState, team_number: i32, job: &MigrationJob) {
    let message = PushMessage::JobStatus {
        job_id: job.id.clone(),
        status: job.status.as_str().to_string(),
        message: job.message.clone(),
    };

    if let Err(err) = state.push.publish(team_number, message) {
        tracing::debug!("Job status push not delivered: {}", err);
    }
}

/// Persist the uploaded archive, register a running job and hand the
/// import to a worker task. Returns the job id immediately.
pub async fn spawn_import(
    state: &AppState,
    team_number: i32,
    archive: Vec<u8>,
) -> Result<String, Error> {
    let job = state.jobs.submit();
    let path = archive_path(&job.id);

    if let Err(err) = tokio::fs::write(&path, &archive).await {
        state
            .jobs
            .fail(&job.id, format!("Failed to persist upload: {}", err));
        return Ok(job.id);
    }

    let worker_state = state.clone();
    let job_id = job.id.clone();

    tokio::spawn(async move {
        run_import(&worker_state, &job_id, team_number).await;

        // The archive is removed whatever the outcome.
        if let Err(err) = tokio::fs::remove_file(archive_path(&job_id)).await {
            tracing::warn!(job_id = %job_id, "Failed to remove import archive: {}", err);
        }

        if let Some(job) = worker_state.jobs.get(&job_id) {
            notify_job_status(&worker_state, team_number, &job);
        }
    });

    Ok(job.id)
}

async fn run_import(state: &AppState, job_id: &str, team_number: i32) {
    let bytes = match tokio::fs::read(archive_path(job_id)).await {
        Ok(bytes) => bytes,
        Err(err) => {
            state
                .jobs
                .fail(job_id, format!("Failed to read upload: {}", err));
            return;
        }
    };

    let import_service = ImportService::new(&state.db);

    match import_service.import(Some(team_number), &bytes).await {
        Ok(report) => {
            let mut message = report.summary();
            if !report.errors.is_empty() {
                message.push_str(&format!("; first error: {}", report.errors[0]));
            }
            state.jobs.finish(job_id, message);
        }
        Err(err) => {
            tracing::error!(job_id = %job_id, "Import failed: {}", err);
            state.jobs.fail(job_id, err.to_string());
        }
    }
}

/// Staleness detection, run on every status read: a job still `running`
/// past the configured threshold is unilaterally marked stalled and a
/// notification is broadcast, so a crashed worker cannot leave a client
/// polling forever.
pub fn check_staleness(state: &AppState, team_number: i32, job: MigrationJob) -> MigrationJob {
    if job.status != JobStatus::Running {
        return job;
    }

    let threshold = Duration::seconds(state.job_stale_after_secs);
    if Utc::now().naive_utc() - job.started_at <= threshold {
        return job;
    }

    match state.jobs.mark_stalled(&job.id) {
        Some(stalled) => {
            tracing::warn!(job_id = %stalled.id, "Marking stalled import job");
            notify_job_status(state, team_number, &stalled);
            stalled
        }
        // Lost a race with the worker finishing; serve the fresh state.
        None => state.jobs.get(&job.id).unwrap_or(job),
    }
}
