//! Error types for the ScoutSync server.
//!
//! Domain-specific error enums (sync, migration, jobs, configuration) are
//! aggregated into a single [`Error`] type via `thiserror`'s `#[from]`
//! conversions. Every error implements `IntoResponse` so handlers can
//! return `Result<_, Error>` and let the error decide its HTTP shape.
//!
//! Uniqueness-constraint conflicts are deliberately absent from this
//! taxonomy: they are caught inside the race-retry helpers and resolved by
//! re-querying the winning row, so they only surface as `DbErr` when the
//! retry itself fails.

pub mod config;
pub mod job;
pub mod migrate;
pub mod sync;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{config::ConfigError, job::JobError, migrate::MigrateError, sync::SyncError},
    model::api::ErrorDto,
};

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Alliance/replication error (membership, activation, outbox access).
    #[error(transparent)]
    SyncError(#[from] SyncError),
    /// Portable migration error (archive parsing, export assembly).
    #[error(transparent)]
    MigrateError(#[from] MigrateError),
    /// Background job error (unknown job id).
    #[error(transparent)]
    JobError(#[from] JobError),
    /// Database error (query failures, connection issues, constraint
    /// violations that survived retry).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Payload (de)serialization error.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::SyncError(err) => err.into_response(),
            Self::MigrateError(err) => err.into_response(),
            Self::JobError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper converting any displayable error into a 500 response with a
/// generic body; the full message is logged, never sent to the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
