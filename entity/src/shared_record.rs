use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The alliance-visible projection of one tenant's record. Identity key:
/// (alliance_id, source_number, source_record_id); re-replication of the
/// same source record always upserts the same row. Soft-deleted via
/// `is_active`, never hard-deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shared_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alliance_id: i32,
    /// Tenant that owns the source record.
    pub source_number: i32,
    pub source_record_id: i32,
    pub kind: String,
    /// Denormalized natural keys so peers can resolve the record without
    /// access to the source tenant's id space.
    pub team_number: i32,
    pub event_code: String,
    pub match_type: Option<String>,
    pub match_number: Option<i32>,
    pub scout_name: String,
    pub payload: Json,
    pub is_active: bool,
    pub last_edited_by: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
