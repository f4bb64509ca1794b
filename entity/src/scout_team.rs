use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scouted robotics team. Natural key: `team_number` within the owning tenant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scout_team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_number: Option<i32>,
    pub team_number: i32,
    pub name: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
