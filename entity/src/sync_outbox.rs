use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One delivery unit from one tenant to one alliance peer for one shared
/// record. Status only ever moves pending -> synced; rows are never
/// deleted and double as the delivery audit trail.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_outbox")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alliance_id: i32,
    pub from_number: i32,
    pub to_number: i32,
    pub data_kind: String,
    pub source_record_id: i32,
    pub payload: Json,
    /// `pending` or `synced`.
    pub status: String,
    pub created_at: DateTime,
    pub synced_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
