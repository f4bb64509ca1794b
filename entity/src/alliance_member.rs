use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership of one tenant in one alliance.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alliance_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alliance_id: i32,
    pub team_number: i32,
    /// `admin` or `member`.
    pub role: String,
    /// `pending` or `accepted`.
    pub status: String,
    /// The member's own "share my data" switch; replication only fans out
    /// writes from members that have this enabled.
    pub share_data: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
