use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-tenant alliance mode toggle: points at zero or one currently-active
/// alliance. A tenant can sit in an alliance's roster with activation off,
/// in which case its data is not exposed and peer data is not shown to it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alliance_activation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub team_number: i32,
    pub alliance_id: Option<i32>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
