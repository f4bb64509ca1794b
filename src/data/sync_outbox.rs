use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::model::domain::OutboxStatus;

pub struct SyncOutboxRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SyncOutboxRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// One delivery row per destination tenant. Rows start pending and are
    /// never deleted; they double as the delivery audit trail.
    pub async fn create(
        &self,
        alliance_id: i32,
        from_number: i32,
        to_number: i32,
        data_kind: &str,
        source_record_id: i32,
        payload: serde_json::Value,
    ) -> Result<entity::sync_outbox::Model, DbErr> {
        let entry = entity::sync_outbox::ActiveModel {
            alliance_id: ActiveValue::Set(alliance_id),
            from_number: ActiveValue::Set(from_number),
            to_number: ActiveValue::Set(to_number),
            data_kind: ActiveValue::Set(data_kind.to_string()),
            source_record_id: ActiveValue::Set(source_record_id),
            payload: ActiveValue::Set(payload),
            status: ActiveValue::Set(OutboxStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            synced_at: ActiveValue::Set(None),
            ..Default::default()
        };

        entry.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::sync_outbox::Model>, DbErr> {
        entity::prelude::SyncOutbox::find_by_id(id).one(self.db).await
    }

    pub async fn get_pending_for(
        &self,
        to_number: i32,
    ) -> Result<Vec<entity::sync_outbox::Model>, DbErr> {
        entity::prelude::SyncOutbox::find()
            .filter(entity::sync_outbox::Column::ToNumber.eq(to_number))
            .filter(entity::sync_outbox::Column::Status.eq(OutboxStatus::Pending.as_str()))
            .order_by_asc(entity::sync_outbox::Column::Id)
            .all(self.db)
            .await
    }

    /// Flip pending -> synced. Idempotent: an already-synced entry is
    /// returned unchanged, so repeated acknowledgments are no-op successes.
    pub async fn ack(
        &self,
        entry: entity::sync_outbox::Model,
    ) -> Result<entity::sync_outbox::Model, DbErr> {
        if entry.status == OutboxStatus::Synced.as_str() {
            return Ok(entry);
        }

        let mut active: entity::sync_outbox::ActiveModel = entry.into();
        active.status = ActiveValue::Set(OutboxStatus::Synced.as_str().to_string());
        active.synced_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        active.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use serde_json::json;

    use crate::{
        data::{alliance::AllianceRepository, sync_outbox::SyncOutboxRepository},
        util::test::setup::test_setup,
    };

    /// Ack flips pending to synced and is a no-op the second time
    #[tokio::test]
    async fn ack_is_idempotent() -> Result<(), DbErr> {
        let test = test_setup().await;
        let alliance_repo = AllianceRepository::new(&test.state.db);
        let outbox_repo = SyncOutboxRepository::new(&test.state.db);

        let alliance = alliance_repo.create("TestAlliance").await?;
        let entry = outbox_repo
            .create(alliance.id, 1111, 2222, "scouting", 42, json!({}))
            .await?;

        assert_eq!(entry.status, "pending");
        assert_eq!(outbox_repo.get_pending_for(2222).await?.len(), 1);

        let acked = outbox_repo.ack(entry).await?;
        assert_eq!(acked.status, "synced");
        assert!(acked.synced_at.is_some());

        let again = outbox_repo.ack(acked.clone()).await?;
        assert_eq!(again.status, "synced");
        assert_eq!(again.synced_at, acked.synced_at);

        assert!(outbox_repo.get_pending_for(2222).await?.is_empty());

        Ok(())
    }
}
