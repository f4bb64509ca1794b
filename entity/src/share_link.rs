use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A globally-shareable artifact (saved graph or team-rank list) keyed by
/// an opaque share id that stays stable across server instances.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "share_link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub share_id: String,
    /// `graph` or `team_ranks`.
    pub kind: String,
    pub owner_number: Option<i32>,
    pub payload: Json,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
