use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct TeamEventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// Outcome of an association attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
    /// Skipped: another team row with the same team_number is already on
    /// the event.
    DuplicateTeamNumber,
}

impl<'a, C: ConnectionTrait> TeamEventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Associate a team with an event, enforcing the rule that no two team
    /// rows sharing a team_number may be on one event. Violations are
    /// skipped with a warning instead of overwriting the existing link.
    pub async fn link_checked(
        &self,
        team: &entity::scout_team::Model,
        event_id: i32,
    ) -> Result<LinkOutcome, DbErr> {
        let existing_team_ids: Vec<i32> = entity::prelude::ScoutTeamEvent::find()
            .filter(entity::scout_team_event::Column::EventId.eq(event_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|link| link.team_id)
            .collect();

        if existing_team_ids.contains(&team.id) {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        if !existing_team_ids.is_empty() {
            let clash = entity::prelude::ScoutTeam::find()
                .filter(entity::scout_team::Column::Id.is_in(existing_team_ids))
                .filter(entity::scout_team::Column::TeamNumber.eq(team.team_number))
                .one(self.db)
                .await?;

            if clash.is_some() {
                tracing::warn!(
                    team_number = team.team_number,
                    event_id,
                    "Skipping association: team number already present on event"
                );
                return Ok(LinkOutcome::DuplicateTeamNumber);
            }
        }

        let link = entity::scout_team_event::ActiveModel {
            team_id: ActiveValue::Set(team.id),
            event_id: ActiveValue::Set(event_id),
            ..Default::default()
        };
        link.insert(self.db).await?;

        Ok(LinkOutcome::Linked)
    }

    pub async fn get_links_for_event(
        &self,
        event_id: i32,
    ) -> Result<Vec<entity::scout_team_event::Model>, DbErr> {
        entity::prelude::ScoutTeamEvent::find()
            .filter(entity::scout_team_event::Column::EventId.eq(event_id))
            .all(self.db)
            .await
    }

    pub async fn delete_link(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::ScoutTeamEvent::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Team rows currently associated with an event.
    pub async fn teams_on_event(
        &self,
        event_id: i32,
    ) -> Result<Vec<entity::scout_team::Model>, DbErr> {
        let team_ids: Vec<i32> = self
            .get_links_for_event(event_id)
            .await?
            .into_iter()
            .map(|link| link.team_id)
            .collect();

        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::ScoutTeam::find()
            .filter(entity::scout_team::Column::Id.is_in(team_ids))
            .all(self.db)
            .await
    }
}
