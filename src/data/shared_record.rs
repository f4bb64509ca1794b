use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

/// Everything needed to project one tenant-local record into an alliance.
#[derive(Clone, Debug)]
pub struct SharedRecordSeed {
    pub alliance_id: i32,
    pub source_number: i32,
    pub source_record_id: i32,
    pub kind: String,
    pub team_number: i32,
    pub event_code: String,
    pub match_type: Option<String>,
    pub match_number: Option<i32>,
    pub scout_name: String,
    pub payload: serde_json::Value,
}

pub struct SharedRecordRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SharedRecordRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Upsert keyed by (alliance_id, source_number, source_record_id).
    /// A re-replicated record overwrites payload and attribution, stamps
    /// the last editor and reactivates a soft-deleted row.
    pub async fn upsert(
        &self,
        seed: SharedRecordSeed,
    ) -> Result<entity::shared_record::Model, DbErr> {
        let row = entity::shared_record::ActiveModel {
            alliance_id: ActiveValue::Set(seed.alliance_id),
            source_number: ActiveValue::Set(seed.source_number),
            source_record_id: ActiveValue::Set(seed.source_record_id),
            kind: ActiveValue::Set(seed.kind),
            team_number: ActiveValue::Set(seed.team_number),
            event_code: ActiveValue::Set(seed.event_code),
            match_type: ActiveValue::Set(seed.match_type),
            match_number: ActiveValue::Set(seed.match_number),
            scout_name: ActiveValue::Set(seed.scout_name),
            payload: ActiveValue::Set(seed.payload),
            is_active: ActiveValue::Set(true),
            last_edited_by: ActiveValue::Set(seed.source_number),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        entity::prelude::SharedRecord::insert(row)
            .on_conflict(
                OnConflict::columns([
                    entity::shared_record::Column::AllianceId,
                    entity::shared_record::Column::SourceNumber,
                    entity::shared_record::Column::SourceRecordId,
                ])
                .update_columns([
                    entity::shared_record::Column::Kind,
                    entity::shared_record::Column::TeamNumber,
                    entity::shared_record::Column::EventCode,
                    entity::shared_record::Column::MatchType,
                    entity::shared_record::Column::MatchNumber,
                    entity::shared_record::Column::ScoutName,
                    entity::shared_record::Column::Payload,
                    entity::shared_record::Column::IsActive,
                    entity::shared_record::Column::LastEditedBy,
                    entity::shared_record::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_id(
        &self,
        id: i32,
    ) -> Result<Option<entity::shared_record::Model>, DbErr> {
        entity::prelude::SharedRecord::find_by_id(id).one(self.db).await
    }

    /// All live shared rows for an alliance, the merged read-path source.
    pub async fn get_active_for_alliance(
        &self,
        alliance_id: i32,
    ) -> Result<Vec<entity::shared_record::Model>, DbErr> {
        entity::prelude::SharedRecord::find()
            .filter(entity::shared_record::Column::AllianceId.eq(alliance_id))
            .filter(entity::shared_record::Column::IsActive.eq(true))
            .all(self.db)
            .await
    }

    /// Soft delete; the row stays for audit and idempotent re-replication.
    pub async fn deactivate(
        &self,
        record: entity::shared_record::Model,
        edited_by: i32,
    ) -> Result<entity::shared_record::Model, DbErr> {
        let mut active: entity::shared_record::ActiveModel = record.into();
        active.is_active = ActiveValue::Set(false);
        active.last_edited_by = ActiveValue::Set(edited_by);
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
            alliance::AllianceRepository,
            shared_record::{SharedRecordRepository, SharedRecordSeed},
        },
        util::test::setup::test_setup,
    };

    fn seed(alliance_id: i32, payload: serde_json::Value) -> SharedRecordSeed {
        SharedRecordSeed {
            alliance_id,
            source_number: 1111,
            source_record_id: 42,
            kind: "scouting".to_string(),
            team_number: 254,
            event_code: "EVTX".to_string(),
            match_type: Some("qualification".to_string()),
            match_number: Some(1),
            scout_name: "scout-a".to_string(),
            payload,
        }
    }

    /// Re-replicating the same source record updates the one existing row
    #[tokio::test]
    async fn upsert_is_keyed_by_identity() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_repo = AllianceRepository::new(&test.state.db);
        let shared_repo = SharedRecordRepository::new(&test.state.db);

        let alliance = alliance_repo.create("TestAlliance").await?;

        let first = shared_repo
            .upsert(seed(alliance.id, json!({"auto_points": 5})))
            .await?;
        let second = shared_repo
            .upsert(seed(alliance.id, json!({"auto_points": 9})))
            .await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.payload, json!({"auto_points": 9}));

        let all = shared_repo.get_active_for_alliance(alliance.id).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    /// A soft-deleted row is revived by the next upsert of its source
    #[tokio::test]
    async fn deactivate_then_upsert_reactivates() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_repo = AllianceRepository::new(&test.state.db);
        let shared_repo = SharedRecordRepository::new(&test.state.db);

        let alliance = alliance_repo.create("TestAlliance").await?;

        let row = shared_repo.upsert(seed(alliance.id, json!({}))).await?;
        shared_repo.deactivate(row, 2222).await?;

        assert!(shared_repo
            .get_active_for_alliance(alliance.id)
            .await?
            .is_empty());

        shared_repo.upsert(seed(alliance.id, json!({}))).await?;

        assert_eq!(
            shared_repo.get_active_for_alliance(alliance.id).await?.len(),
            1
        );

        Ok(())
    }
}
