use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    controller::ActingTenant,
    error::{job::JobError, Error},
    job::runner,
    model::{
        api::{ErrorDto, JobStatusDto},
        app::AppState,
    },
};

pub static JOBS_TAG: &str = "jobs";

/// Status of a background import job
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = JOBS_TAG,
    params(
        ("id" = String, Path, description = "Job id returned on submission")
    ),
    responses(
        (status = 200, description = "Current job state", body = JobStatusDto),
        (status = 404, description = "Unknown job id", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_job(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| JobError::NotFound(id.clone()))?;

    let job = runner::check_staleness(&state, team_number, job);

    Ok((
        StatusCode::OK,
        Json(JobStatusDto {
            status: job.status.as_str().to_string(),
            message: job.message,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }),
    ))
}
