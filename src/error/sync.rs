use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{error::InternalServerError, model::api::ErrorDto};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Tenant {0} has no active alliance")]
    AllianceInactive(i32),
    #[error("Tenant {team_number} is not an accepted member of alliance {alliance_id}")]
    NotAMember { alliance_id: i32, team_number: i32 },
    #[error("Tenant {0} is not an admin of the active alliance")]
    NotAnAdmin(i32),
    #[error("Alliance {0:?} not found")]
    AllianceNotFound(String),
    #[error("Alliance name {0:?} is already taken")]
    AllianceNameTaken(String),
    #[error("No pending invite for tenant {0}")]
    InviteNotFound(i32),
    #[error("Outbox entry {0} not found")]
    OutboxEntryNotFound(i32),
    #[error("Outbox entry {entry_id} is not addressed to tenant {team_number}")]
    OutboxEntryForbidden { entry_id: i32, team_number: i32 },
    #[error("Shared record {0} not found")]
    SharedRecordNotFound(i32),
    #[error("Record write is missing a resolvable {0}")]
    MissingReference(&'static str),
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        match self {
            Self::AllianceNotFound(_)
            | Self::InviteNotFound(_)
            | Self::OutboxEntryNotFound(_)
            | Self::SharedRecordNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            Self::AllianceInactive(_) | Self::AllianceNameTaken(_) | Self::MissingReference(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            Self::NotAMember { .. } | Self::NotAnAdmin(_) | Self::OutboxEntryForbidden { .. } => (
                StatusCode::FORBIDDEN,
                Json(ErrorDto {
                    error: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Best-effort push delivery failure. Logged at the call site and never
/// allowed to influence the outcome of the business transaction; the
/// outbox remains the single source of truth for delivery state.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("No live channel for tenant {0}")]
    NoSubscribers(i32),
    #[error("Push channel for tenant {0} rejected the message")]
    ChannelClosed(i32),
}

impl IntoResponse for PushError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
