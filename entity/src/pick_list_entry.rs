use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One entry on a tenant's do-not-pick or avoid list.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pick_list_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_number: Option<i32>,
    /// `do_not_pick` or `avoid`.
    pub kind: String,
    pub team_number: i32,
    pub reason: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
