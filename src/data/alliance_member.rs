use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::model::domain::{MemberRole, MemberStatus};

pub struct AllianceMemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AllianceMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        alliance_id: i32,
        team_number: i32,
        role: MemberRole,
        status: MemberStatus,
    ) -> Result<entity::alliance_member::Model, DbErr> {
        let member = entity::alliance_member::ActiveModel {
            alliance_id: ActiveValue::Set(alliance_id),
            team_number: ActiveValue::Set(team_number),
            role: ActiveValue::Set(role.as_str().to_string()),
            status: ActiveValue::Set(status.as_str().to_string()),
            share_data: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        member.insert(self.db).await
    }

    pub async fn get(
        &self,
        alliance_id: i32,
        team_number: i32,
    ) -> Result<Option<entity::alliance_member::Model>, DbErr> {
        entity::prelude::AllianceMember::find()
            .filter(entity::alliance_member::Column::AllianceId.eq(alliance_id))
            .filter(entity::alliance_member::Column::TeamNumber.eq(team_number))
            .one(self.db)
            .await
    }

    pub async fn get_all(
        &self,
        alliance_id: i32,
    ) -> Result<Vec<entity::alliance_member::Model>, DbErr> {
        entity::prelude::AllianceMember::find()
            .filter(entity::alliance_member::Column::AllianceId.eq(alliance_id))
            .all(self.db)
            .await
    }

    pub async fn get_accepted(
        &self,
        alliance_id: i32,
    ) -> Result<Vec<entity::alliance_member::Model>, DbErr> {
        entity::prelude::AllianceMember::find()
            .filter(entity::alliance_member::Column::AllianceId.eq(alliance_id))
            .filter(entity::alliance_member::Column::Status.eq(MemberStatus::Accepted.as_str()))
            .all(self.db)
            .await
    }

    pub async fn set_status(
        &self,
        member: entity::alliance_member::Model,
        status: MemberStatus,
    ) -> Result<entity::alliance_member::Model, DbErr> {
        let mut active: entity::alliance_member::ActiveModel = member.into();
        active.status = ActiveValue::Set(status.as_str().to_string());
        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        active.update(self.db).await
    }

    pub async fn set_share_data(
        &self,
        member: entity::alliance_member::Model,
        share_data: bool,
    ) -> Result<entity::alliance_member::Model, DbErr> {
        let mut active: entity::alliance_member::ActiveModel = member.into();
        active.share_data = ActiveValue::Set(share_data);
        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        active.update(self.db).await
    }

    /// Remove a member from the roster. Previously-created shared records
    /// and outbox entries are left untouched.
    pub async fn remove(&self, member: entity::alliance_member::Model) -> Result<(), DbErr> {
        entity::prelude::AllianceMember::delete_by_id(member.id)
            .exec(self.db)
            .await?;

        Ok(())
    }
}
