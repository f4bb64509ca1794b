use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

/// Mutable fields of a match, besides its natural key.
#[derive(Clone, Debug, Default)]
pub struct MatchSeed {
    pub red_alliance: Option<String>,
    pub blue_alliance: Option<String>,
    pub red_score: Option<i32>,
    pub blue_score: Option<i32>,
}

pub struct MatchRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MatchRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_natural_key(
        &self,
        event_id: i32,
        match_type: &str,
        match_number: i32,
    ) -> Result<Option<entity::scout_match::Model>, DbErr> {
        entity::prelude::ScoutMatch::find()
            .filter(entity::scout_match::Column::EventId.eq(event_id))
            .filter(entity::scout_match::Column::MatchType.eq(match_type))
            .filter(entity::scout_match::Column::MatchNumber.eq(match_number))
            .one(self.db)
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::scout_match::Model>, DbErr> {
        entity::prelude::ScoutMatch::find_by_id(id).one(self.db).await
    }

    pub async fn get_by_event(
        &self,
        event_id: i32,
    ) -> Result<Vec<entity::scout_match::Model>, DbErr> {
        entity::prelude::ScoutMatch::find()
            .filter(entity::scout_match::Column::EventId.eq(event_id))
            .all(self.db)
            .await
    }

    pub async fn create(
        &self,
        owner_number: Option<i32>,
        event_id: i32,
        match_type: &str,
        match_number: i32,
        seed: &MatchSeed,
    ) -> Result<entity::scout_match::Model, DbErr> {
        let game_match = entity::scout_match::ActiveModel {
            owner_number: ActiveValue::Set(owner_number),
            event_id: ActiveValue::Set(event_id),
            match_type: ActiveValue::Set(match_type.to_string()),
            match_number: ActiveValue::Set(match_number),
            red_alliance: ActiveValue::Set(seed.red_alliance.clone()),
            blue_alliance: ActiveValue::Set(seed.blue_alliance.clone()),
            red_score: ActiveValue::Set(seed.red_score),
            blue_score: ActiveValue::Set(seed.blue_score),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        game_match.insert(self.db).await
    }

    /// Update-or-create by (event, match_type, match_number). Returns the
    /// row and whether it was created.
    pub async fn upsert_by_natural_key(
        &self,
        owner_number: Option<i32>,
        event_id: i32,
        match_type: &str,
        match_number: i32,
        seed: &MatchSeed,
    ) -> Result<(entity::scout_match::Model, bool), DbErr> {
        if let Some(existing) = self
            .get_by_natural_key(event_id, match_type, match_number)
            .await?
        {
            let mut active: entity::scout_match::ActiveModel = existing.into();

            if seed.red_alliance.is_some() {
                active.red_alliance = ActiveValue::Set(seed.red_alliance.clone());
            }
            if seed.blue_alliance.is_some() {
                active.blue_alliance = ActiveValue::Set(seed.blue_alliance.clone());
            }
            if seed.red_score.is_some() {
                active.red_score = ActiveValue::Set(seed.red_score);
            }
            if seed.blue_score.is_some() {
                active.blue_score = ActiveValue::Set(seed.blue_score);
            }
            active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

            return Ok((active.update(self.db).await?, false));
        }

        let created = self
            .create(owner_number, event_id, match_type, match_number, seed)
            .await?;

        Ok((created, true))
    }

    /// Re-point a match at another event, used when collapsing duplicate
    /// events. Fails with a unique violation if the target event already
    /// has a match with the same type and number.
    pub async fn repoint_event(
        &self,
        game_match: entity::scout_match::Model,
        event_id: i32,
    ) -> Result<entity::scout_match::Model, DbErr> {
        let mut active: entity::scout_match::ActiveModel = game_match.into();
        active.event_id = ActiveValue::Set(event_id);
        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        active.update(self.db).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::ScoutMatch::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use crate::{
        data::{
            event::{EventRepository, EventSeed},
            game_match::{MatchRepository, MatchSeed},
        },
        util::test::setup::test_setup,
    };

    /// Upsert returns created=true once, then updates in place
    #[tokio::test]
    async fn upsert_by_natural_key_is_idempotent() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);
        let match_repo = MatchRepository::new(&test.state.db);

        let seed = EventSeed {
            code: "EVTX".to_string(),
            ..Default::default()
        };
        let event = event_repo.create(Some(1111), &seed, 2026).await?;

        let (first, created) = match_repo
            .upsert_by_natural_key(Some(1111), event.id, "qualification", 1, &MatchSeed::default())
            .await?;
        assert!(created);

        let richer = MatchSeed {
            red_score: Some(87),
            blue_score: Some(42),
            ..Default::default()
        };
        let (second, created) = match_repo
            .upsert_by_natural_key(Some(1111), event.id, "qualification", 1, &richer)
            .await?;

        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.red_score, Some(87));

        Ok(())
    }
}
