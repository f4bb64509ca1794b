use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Association between a team and an event.
///
/// The uniqueness of (team_id, event_id) is enforced by the database; the
/// stronger rule that no two teams sharing a team_number may be linked to
/// the same event is enforced in the data layer before every write.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scout_team_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub team_id: i32,
    pub event_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
