use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    controller::ActingTenant,
    error::Error,
    job::runner,
    model::{
        api::{ErrorDto, JobSubmittedDto},
        app::AppState,
        report::MergeReport,
    },
    service::{migrate::export::ExportService, reconcile::ReconcileService},
};

pub static MIGRATE_TAG: &str = "migrate";

/// Upload a portable archive and start a background import
#[utoipa::path(
    post,
    path = "/api/migrate/import",
    tag = MIGRATE_TAG,
    request_body(content = Vec<u8>, content_type = "application/zip"),
    responses(
        (status = 202, description = "Import accepted; poll the job for progress", body = JobSubmittedDto),
        (status = 400, description = "Missing tenant header", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let job_id = runner::spawn_import(&state, team_number, body.to_vec()).await?;

    Ok((StatusCode::ACCEPTED, Json(JobSubmittedDto { job_id })))
}

/// Download the caller's complete dataset as a zip archive
#[utoipa::path(
    get,
    path = "/api/migrate/export",
    tag = MIGRATE_TAG,
    responses(
        (status = 200, description = "Zip archive of the caller's dataset", content_type = "application/zip"),
        (status = 400, description = "Missing tenant header", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Result<impl IntoResponse, Error> {
    let export_service = ExportService::new(&state.db);

    let archive = export_service.export(Some(team_number)).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"scoutsync-{}.zip\"", team_number),
            ),
        ],
        archive,
    ))
}

/// Collapse the caller's duplicate events into canonical rows
#[utoipa::path(
    post,
    path = "/api/migrate/reconcile",
    tag = MIGRATE_TAG,
    responses(
        (status = 200, description = "Merge pass outcome", body = MergeReport),
        (status = 400, description = "Missing tenant header", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reconcile(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Result<impl IntoResponse, Error> {
    let reconcile_service = ReconcileService::new(&state.db);

    let report = reconcile_service.reconcile_events(Some(team_number)).await?;

    Ok((StatusCode::OK, Json(report)))
}
