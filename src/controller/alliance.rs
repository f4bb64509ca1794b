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
        api::{
            ActivateAllianceDto, AllianceDto, AllianceStatusDto, CreateAllianceDto, ErrorDto,
            InviteMemberDto, RespondInviteDto, ShareDataDto, SharedEventsDto,
        },
        app::AppState,
    },
    service::alliance::AllianceService,
};

pub static ALLIANCE_TAG: &str = "alliance";

/// Create an alliance with the caller as its accepted admin
#[utoipa::path(
    post,
    path = "/api/alliance",
    tag = ALLIANCE_TAG,
    request_body = CreateAllianceDto,
    responses(
        (status = 201, description = "Alliance created", body = AllianceDto),
        (status = 400, description = "Name already taken", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_alliance(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<CreateAllianceDto>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    let alliance = alliance_service
        .create_alliance(team_number, &dto.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AllianceDto {
            id: alliance.id,
            name: alliance.name,
        }),
    ))
}

/// Invite a tenant to the caller's active alliance (admin only)
#[utoipa::path(
    post,
    path = "/api/alliance/invite",
    tag = ALLIANCE_TAG,
    request_body = InviteMemberDto,
    responses(
        (status = 204, description = "Invite created or already present"),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn invite_member(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<InviteMemberDto>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    alliance_service
        .invite_member(team_number, dto.team_number)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Accept or decline a pending invite
#[utoipa::path(
    post,
    path = "/api/alliance/respond",
    tag = ALLIANCE_TAG,
    request_body = RespondInviteDto,
    responses(
        (status = 204, description = "Response recorded"),
        (status = 404, description = "No pending invite", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn respond_to_invite(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<RespondInviteDto>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    alliance_service
        .respond_to_invite(team_number, dto.alliance_id, dto.accept)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Turn alliance mode on for the caller
#[utoipa::path(
    post,
    path = "/api/alliance/activate",
    tag = ALLIANCE_TAG,
    request_body = ActivateAllianceDto,
    responses(
        (status = 204, description = "Alliance mode activated"),
        (status = 403, description = "Caller is not an accepted member", body = ErrorDto),
        (status = 404, description = "Alliance not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn activate(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<ActivateAllianceDto>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    alliance_service.activate(team_number, dto.alliance_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Turn alliance mode off; roster membership is unaffected
#[utoipa::path(
    post,
    path = "/api/alliance/deactivate",
    tag = ALLIANCE_TAG,
    responses(
        (status = 204, description = "Alliance mode deactivated"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn deactivate(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    alliance_service.deactivate(team_number).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Event codes the caller's active alliance shares
#[utoipa::path(
    get,
    path = "/api/alliance/shared-events",
    tag = ALLIANCE_TAG,
    responses(
        (status = 200, description = "Shared event codes", body = SharedEventsDto),
        (status = 400, description = "No active alliance", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_shared_events(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    let event_codes = alliance_service.get_shared_event_codes(team_number).await?;

    Ok((StatusCode::OK, Json(SharedEventsDto { event_codes })))
}

/// Replace the shared event code list (admin only)
#[utoipa::path(
    put,
    path = "/api/alliance/shared-events",
    tag = ALLIANCE_TAG,
    request_body = SharedEventsDto,
    responses(
        (status = 200, description = "Normalized shared event codes", body = SharedEventsDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn put_shared_events(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<SharedEventsDto>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    let event_codes = alliance_service
        .set_shared_event_codes(team_number, &dto.event_codes)
        .await?;

    Ok((StatusCode::OK, Json(SharedEventsDto { event_codes })))
}

/// Opt the caller in or out of contributing data to the alliance
#[utoipa::path(
    put,
    path = "/api/alliance/share-data",
    tag = ALLIANCE_TAG,
    request_body = ShareDataDto,
    responses(
        (status = 204, description = "Share flag updated"),
        (status = 400, description = "No active alliance", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn put_share_data(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
    Json(dto): Json<ShareDataDto>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    alliance_service
        .set_share_data(team_number, dto.share_data)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Roster and sharing status of the caller's active alliance
#[utoipa::path(
    get,
    path = "/api/alliance/status",
    tag = ALLIANCE_TAG,
    responses(
        (status = 200, description = "Alliance status for the caller", body = AllianceStatusDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_status(
    State(state): State<AppState>,
    ActingTenant(team_number): ActingTenant,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    let status = alliance_service.status(team_number).await?;

    Ok((StatusCode::OK, Json(status)))
}

/// Remove a member from the caller's active alliance (admin only)
#[utoipa::path(
    delete,
    path = "/api/alliance/members/{team_number}",
    tag = ALLIANCE_TAG,
    params(
        ("team_number" = i32, Path, description = "Member to remove")
    ),
    responses(
        (status = 204, description = "Member removed; shared history is kept"),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_member(
    State(state): State<AppState>,
    ActingTenant(admin_number): ActingTenant,
    Path(team_number): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let alliance_service = AllianceService::new(&state.db);

    alliance_service.remove_member(admin_number, team_number).await?;

    Ok(StatusCode::NO_CONTENT)
}
