use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Archive is not a readable zip container: {0}")]
    BadContainer(String),
    #[error("Archive entry {name:?} could not be parsed: {reason}")]
    BadEntry { name: String, reason: String },
    #[error("Archive contains no recognized entity files")]
    EmptyArchive,
}

impl IntoResponse for MigrateError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
