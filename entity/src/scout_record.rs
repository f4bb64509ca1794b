use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An observational record: match scouting, pit scouting or a qualitative
/// entry (strategy drawing). The structured payload is opaque to this
/// layer; its schema belongs to the form layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scout_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_number: Option<i32>,
    /// `scouting`, `pit` or `qualitative`.
    pub kind: String,
    pub team_id: i32,
    /// Required for kind=scouting, absent for pit records.
    pub match_id: Option<i32>,
    pub scout_name: String,
    pub payload: Json,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
