use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::{data::owner_eq, model::domain::RecordKind};

pub struct RecordRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RecordRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_natural_key(
        &self,
        owner_number: Option<i32>,
        kind: RecordKind,
        team_id: i32,
        match_id: Option<i32>,
    ) -> Result<Option<entity::scout_record::Model>, DbErr> {
        let match_filter = match match_id {
            Some(id) => entity::scout_record::Column::MatchId.eq(id),
            None => entity::scout_record::Column::MatchId.is_null(),
        };

        entity::prelude::ScoutRecord::find()
            .filter(owner_eq(entity::scout_record::Column::OwnerNumber, owner_number))
            .filter(entity::scout_record::Column::Kind.eq(kind.as_str()))
            .filter(entity::scout_record::Column::TeamId.eq(team_id))
            .filter(match_filter)
            .one(self.db)
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::scout_record::Model>, DbErr> {
        entity::prelude::ScoutRecord::find_by_id(id).one(self.db).await
    }

    pub async fn get_all_by_owner(
        &self,
        owner_number: Option<i32>,
    ) -> Result<Vec<entity::scout_record::Model>, DbErr> {
        entity::prelude::ScoutRecord::find()
            .filter(owner_eq(entity::scout_record::Column::OwnerNumber, owner_number))
            .all(self.db)
            .await
    }

    pub async fn get_by_owner_and_kind(
        &self,
        owner_number: Option<i32>,
        kind: RecordKind,
    ) -> Result<Vec<entity::scout_record::Model>, DbErr> {
        entity::prelude::ScoutRecord::find()
            .filter(owner_eq(entity::scout_record::Column::OwnerNumber, owner_number))
            .filter(entity::scout_record::Column::Kind.eq(kind.as_str()))
            .all(self.db)
            .await
    }

    pub async fn create(
        &self,
        owner_number: Option<i32>,
        kind: RecordKind,
        team_id: i32,
        match_id: Option<i32>,
        scout_name: &str,
        payload: serde_json::Value,
    ) -> Result<entity::scout_record::Model, DbErr> {
        let record = entity::scout_record::ActiveModel {
            owner_number: ActiveValue::Set(owner_number),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            team_id: ActiveValue::Set(team_id),
            match_id: ActiveValue::Set(match_id),
            scout_name: ActiveValue::Set(scout_name.to_string()),
            payload: ActiveValue::Set(payload),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        record.insert(self.db).await
    }

    /// Replace payload and attribution wholesale (last-writer-wins per
    /// record, the foreground write semantics).
    pub async fn update_replace(
        &self,
        record: entity::scout_record::Model,
        scout_name: &str,
        payload: serde_json::Value,
    ) -> Result<entity::scout_record::Model, DbErr> {
        let mut active: entity::scout_record::ActiveModel = record.into();
        active.scout_name = ActiveValue::Set(scout_name.to_string());
        active.payload = ActiveValue::Set(payload);
        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        active.update(self.db).await
    }

    /// Overwrite only the payload, leaving attribution alone; used by the
    /// import path after a conservative merge.
    pub async fn update_payload(
        &self,
        record: entity::scout_record::Model,
        payload: serde_json::Value,
    ) -> Result<entity::scout_record::Model, DbErr> {
        let mut active: entity::scout_record::ActiveModel = record.into();
        active.payload = ActiveValue::Set(payload);
        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        active.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use serde_json::json;

    use crate::{
        data::{
            event::{EventRepository, EventSeed},
            game_match::{MatchRepository, MatchSeed},
            record::RecordRepository,
            team::TeamRepository,
        },
        model::domain::RecordKind,
        util::test::setup::test_setup,
    };

    /// Pit records (no match) and scouting records (with match) coexist
    /// for one team under the natural-key index
    #[tokio::test]
    async fn natural_key_distinguishes_kinds() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);
        let team_repo = TeamRepository::new(&test.state.db);
        let match_repo = MatchRepository::new(&test.state.db);
        let record_repo = RecordRepository::new(&test.state.db);

        let seed = EventSeed {
            code: "EVTX".to_string(),
            ..Default::default()
        };
        let event = event_repo.create(Some(1111), &seed, 2026).await?;
        let team = team_repo.create(Some(1111), 254, None, None).await?;
        let (game_match, _) = match_repo
            .upsert_by_natural_key(Some(1111), event.id, "qualification", 1, &MatchSeed::default())
            .await?;

        record_repo
            .create(
                Some(1111),
                RecordKind::Scouting,
                team.id,
                Some(game_match.id),
                "scout-a",
                json!({"auto_points": 12}),
            )
            .await?;
        record_repo
            .create(
                Some(1111),
                RecordKind::Pit,
                team.id,
                None,
                "scout-b",
                json!({"drivetrain": "swerve"}),
            )
            .await?;

        let scouting = record_repo
            .get_by_natural_key(Some(1111), RecordKind::Scouting, team.id, Some(game_match.id))
            .await?;
        let pit = record_repo
            .get_by_natural_key(Some(1111), RecordKind::Pit, team.id, None)
            .await?;

        assert!(scouting.is_some());
        assert!(pit.is_some());
        assert_ne!(scouting.unwrap().id, pit.unwrap().id);

        Ok(())
    }
}
