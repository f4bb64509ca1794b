use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    controller::ActingTenant,
    error::Error,
    model::{
        api::{ErrorDto, RecordDto, RecordListQuery, SubmitRecordDto},
        app::AppState,
        domain::DedupPreference,
    },
    service::replication::ReplicationService,
};

pub static RECORDS_TAG: &str = "records";

/// Create or update a record by its natural key
#[utoipa::path(
    post,
    path = "/api/records",
    tag = RECORDS_TAG,
    request_body = SubmitRecordDto,
    responses(
        (status = 201, description = "Record stored; replication into the active alliance has run", body = RecordDto),
        (status = 400, description = "Missing match reference for a per-match kind", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_record(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<SubmitRecordDto>,
) -> Result<impl IntoResponse, Error> {
    let replication_service = ReplicationService::new(&state.db, &state.push);

    let record = replication_service.submit_record(team_number, dto).await?;
    let dto = replication_service.local_record_dto(record).await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

/// Scope-resolved record listing
#[utoipa::path(
    get,
    path = "/api/records",
    tag = RECORDS_TAG,
    params(RecordListQuery),
    responses(
        (status = 200, description = "Records visible to the caller, deduplicated", body = Vec<RecordDto>),
        (status = 400, description = "Missing tenant header", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_records(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Query(query): Query<RecordListQuery>,
) -> Result<impl IntoResponse, Error> {
    let replication_service = ReplicationService::new(&state.db, &state.push);

    let records = replication_service
        .list_records(
            team_number,
            query.kind,
            query.prefer.unwrap_or(DedupPreference::PreferAlliance),
        )
        .await?;

    Ok((StatusCode::OK, Json(records)))
}

/// Soft-delete a shared contribution from the caller's active alliance
#[utoipa::path(
    delete,
    path = "/api/shared-records/{id}",
    tag = RECORDS_TAG,
    params(
        ("id" = i32, Path, description = "Shared record id")
    ),
    responses(
        (status = 204, description = "Contribution hidden from the alliance"),
        (status = 403, description = "Caller is neither the source nor an admin", body = ErrorDto),
        (status = 404, description = "No such contribution in the caller's active alliance", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_shared_record(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let replication_service = ReplicationService::new(&state.db, &state.push);

    replication_service
        .remove_shared_record(team_number, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
