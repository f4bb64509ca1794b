//! HTTP request handlers.
//!
//! There is no authentication layer in this deployment; the acting tenant
//! is carried by the `X-Team-Number` header and trusted as-is.

pub mod alliance;
pub mod jobs;
pub mod migrate;
pub mod push;
pub mod records;
pub mod sync;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};

use crate::model::api::ErrorDto;

pub const TENANT_HEADER: &str = "x-team-number";

/// Caller identity extractor: the scouting team number acting as tenant.
pub struct ActingTenant(pub i32);

impl<S> FromRequestParts<S> for ActingTenant
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorDto>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let team_number = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok());

        match team_number {
            Some(team_number) if team_number > 0 => Ok(Self(team_number)),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorDto {
                    error: format!("Missing or invalid {} header", TENANT_HEADER),
                }),
            )),
        }
    }
}
