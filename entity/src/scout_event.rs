use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A competition event. Natural key: normalized `code` + `year` within the
/// owning tenant, with `name` + `year` as a fallback for resolution.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scout_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning tenant (scouting team number); `None` for legacy unassigned rows.
    pub owner_number: Option<i32>,
    /// Normalized event code (trimmed, uppercased).
    pub code: String,
    pub name: Option<String>,
    pub year: i32,
    pub location: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub timezone: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
