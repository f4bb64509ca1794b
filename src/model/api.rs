//! Request/response DTOs for the HTTP API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::domain::{DedupPreference, MemberRole, MemberStatus, RecordKind};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAllianceDto {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllianceDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteMemberDto {
    pub team_number: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RespondInviteDto {
    pub alliance_id: i32,
    pub accept: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivateAllianceDto {
    pub alliance_id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SharedEventsDto {
    pub event_codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShareDataDto {
    pub share_data: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllianceStatusDto {
    pub alliance_id: Option<i32>,
    pub alliance_name: Option<String>,
    pub active: bool,
    pub is_admin: bool,
    pub members: Vec<MemberDto>,
    pub shared_event_codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    pub team_number: i32,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub share_data: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitRecordDto {
    pub kind: RecordKind,
    pub team_number: i32,
    /// Event the observation belongs to; resolved (or created) by code.
    pub event_code: String,
    /// Required for kind=scouting.
    pub match_type: Option<String>,
    pub match_number: Option<i32>,
    pub scout_name: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordDto {
    pub id: i32,
    pub kind: String,
    pub team_number: i32,
    /// Known via the match for per-match records; matchless local rows
    /// have no event reference.
    pub event_code: Option<String>,
    pub match_type: Option<String>,
    pub match_number: Option<i32>,
    pub scout_name: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    /// Tenant the row originated from; differs from the caller for
    /// alliance-shared rows.
    pub source_number: Option<i32>,
    /// Set when the row is served from the alliance-shared projection.
    pub shared_record_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordListQuery {
    /// Restrict the listing to one record kind.
    pub kind: Option<RecordKind>,
    /// Which copy wins for the caller's own shared rows; defaults to the
    /// alliance projection.
    pub prefer: Option<DedupPreference>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingDeliveryDto {
    /// Opaque delivery id used for acknowledgment.
    pub id: i32,
    pub data_kind: String,
    pub from_number: i32,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AckResponseDto {
    pub id: i32,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobSubmittedDto {
    pub job_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobStatusDto {
    pub status: String,
    pub message: Option<String>,
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
}
