use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    controller::ActingTenant,
    error::Error,
    model::{
        api::{AckResponseDto, ErrorDto, PendingDeliveryDto},
        app::AppState,
    },
    service::replication::ReplicationService,
};

pub static SYNC_TAG: &str = "sync";

/// List the caller's pending alliance deliveries, oldest first
#[utoipa::path(
    get,
    path = "/api/sync/poll",
    tag = SYNC_TAG,
    responses(
        (status = 200, description = "Pending deliveries for the caller", body = Vec<PendingDeliveryDto>),
        (status = 400, description = "Missing tenant header", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn poll(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Result<impl IntoResponse, Error> {
    let replication_service = ReplicationService::new(&state.db, &state.push);

    let pending = replication_service.poll(team_number).await?;

    Ok((StatusCode::OK, Json(pending)))
}

/// Acknowledge one delivery; repeat acknowledgments are no-op successes
#[utoipa::path(
    post,
    path = "/api/sync/ack/{id}",
    tag = SYNC_TAG,
    params(
        ("id" = i32, Path, description = "Delivery id returned by poll")
    ),
    responses(
        (status = 200, description = "Delivery acknowledged", body = AckResponseDto),
        (status = 403, description = "Delivery addressed to another tenant", body = ErrorDto),
        (status = 404, description = "Unknown delivery id", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn ack(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let replication_service = ReplicationService::new(&state.db, &state.push);

    let entry = replication_service.ack(team_number, id).await?;

    Ok((
        StatusCode::OK,
        Json(AckResponseDto {
            id: entry.id,
            status: entry.status,
        }),
    ))
}
