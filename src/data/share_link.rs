use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::{
    data::{find_or_create, owner_eq},
    model::domain::ShareLinkKind,
};

pub struct ShareLinkRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ShareLinkRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_share_id(
        &self,
        share_id: &str,
    ) -> Result<Option<entity::share_link::Model>, DbErr> {
        entity::prelude::ShareLink::find()
            .filter(entity::share_link::Column::ShareId.eq(share_id))
            .one(self.db)
            .await
    }

    pub async fn get_all_by_owner(
        &self,
        owner_number: Option<i32>,
    ) -> Result<Vec<entity::share_link::Model>, DbErr> {
        entity::prelude::ShareLink::find()
            .filter(owner_eq(entity::share_link::Column::OwnerNumber, owner_number))
            .all(self.db)
            .await
    }

    /// Upsert keyed by the globally-unique share id. A concurrent insert
    /// of the same id is caught and resolved by updating the winner.
    /// Returns the row and whether it was created.
    pub async fn upsert_by_share_id(
        &self,
        share_id: &str,
        kind: ShareLinkKind,
        owner_number: Option<i32>,
        payload: serde_json::Value,
    ) -> Result<(entity::share_link::Model, bool), DbErr> {
        if let Some(existing) = self.get_by_share_id(share_id).await? {
            return Ok((self.update_payload(existing, payload).await?, false));
        }

        let inserted = find_or_create(
            || self.get_by_share_id(share_id),
            || async {
                let link = entity::share_link::ActiveModel {
                    share_id: ActiveValue::Set(share_id.to_string()),
                    kind: ActiveValue::Set(kind.as_str().to_string()),
                    owner_number: ActiveValue::Set(owner_number),
                    payload: ActiveValue::Set(payload.clone()),
                    created_at: ActiveValue::Set(Utc::now().naive_utc()),
                    updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                    ..Default::default()
                };
                link.insert(self.db).await
            },
        )
        .await?;

        // find_or_create may have returned a row committed by a concurrent
        // caller; make sure this caller's payload still lands.
        if inserted.payload != payload {
            return Ok((self.update_payload(inserted, payload).await?, false));
        }

        Ok((inserted, true))
    }

    async fn update_payload(
        &self,
        link: entity::share_link::Model,
        payload: serde_json::Value,
    ) -> Result<entity::share_link::Model, DbErr> {
        let mut active: entity::share_link::ActiveModel = link.into();
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
        data::share_link::ShareLinkRepository, model::domain::ShareLinkKind,
        util::test::setup::test_setup,
    };

    /// Upserting the same share id twice updates in place
    #[tokio::test]
    async fn upsert_by_share_id_updates_existing() -> Result<(), DbErr> {
        let test = test_setup().await;
        let link_repo = ShareLinkRepository::new(&test.state.db);

        let (first, created) = link_repo
            .upsert_by_share_id("abc123", ShareLinkKind::Graph, Some(1111), json!({"v": 1}))
            .await?;
        assert!(created);

        let (second, created) = link_repo
            .upsert_by_share_id("abc123", ShareLinkKind::Graph, Some(1111), json!({"v": 2}))
            .await?;

        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.payload, json!({"v": 2}));

        Ok(())
    }
}
