use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::{data::owner_eq, model::domain::PickListKind};

pub struct PickListRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PickListRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_natural_key(
        &self,
        owner_number: Option<i32>,
        kind: PickListKind,
        team_number: i32,
    ) -> Result<Option<entity::pick_list_entry::Model>, DbErr> {
        entity::prelude::PickListEntry::find()
            .filter(owner_eq(entity::pick_list_entry::Column::OwnerNumber, owner_number))
            .filter(entity::pick_list_entry::Column::Kind.eq(kind.as_str()))
            .filter(entity::pick_list_entry::Column::TeamNumber.eq(team_number))
            .one(self.db)
            .await
    }

    pub async fn get_all_by_owner(
        &self,
        owner_number: Option<i32>,
        kind: PickListKind,
    ) -> Result<Vec<entity::pick_list_entry::Model>, DbErr> {
        entity::prelude::PickListEntry::find()
            .filter(owner_eq(entity::pick_list_entry::Column::OwnerNumber, owner_number))
            .filter(entity::pick_list_entry::Column::Kind.eq(kind.as_str()))
            .all(self.db)
            .await
    }

    /// Update-or-create by (owner, kind, team_number); returns whether a
    /// new row was created.
    pub async fn upsert(
        &self,
        owner_number: Option<i32>,
        kind: PickListKind,
        team_number: i32,
        reason: Option<String>,
    ) -> Result<(entity::pick_list_entry::Model, bool), DbErr> {
        if let Some(existing) = self
            .get_by_natural_key(owner_number, kind, team_number)
            .await?
        {
            if reason.is_some() && existing.reason != reason {
                let mut active: entity::pick_list_entry::ActiveModel = existing.into();
                active.reason = ActiveValue::Set(reason);
                return Ok((active.update(self.db).await?, false));
            }
            return Ok((existing, false));
        }

        let entry = entity::pick_list_entry::ActiveModel {
            owner_number: ActiveValue::Set(owner_number),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            team_number: ActiveValue::Set(team_number),
            reason: ActiveValue::Set(reason),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok((entry.insert(self.db).await?, true))
    }
}
