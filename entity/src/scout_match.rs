use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A match at an event. Natural key: (event_id, match_type, match_number).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scout_match")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_number: Option<i32>,
    pub event_id: i32,
    /// Qualification, playoff or practice; stored as a free string.
    pub match_type: String,
    pub match_number: i32,
    /// Comma-joined team numbers for each alliance, as reported by the source.
    pub red_alliance: Option<String>,
    pub blue_alliance: Option<String>,
    pub red_score: Option<i32>,
    pub blue_score: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
