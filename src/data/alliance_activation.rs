use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct AllianceActivationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AllianceActivationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_for_team(
        &self,
        team_number: i32,
    ) -> Result<Option<entity::alliance_activation::Model>, DbErr> {
        entity::prelude::AllianceActivation::find()
            .filter(entity::alliance_activation::Column::TeamNumber.eq(team_number))
            .one(self.db)
            .await
    }

    /// Point the tenant's activation at an alliance, or clear it with
    /// `None`. One row per tenant, created on first use.
    pub async fn set_active(
        &self,
        team_number: i32,
        alliance_id: Option<i32>,
    ) -> Result<entity::alliance_activation::Model, DbErr> {
        if let Some(existing) = self.get_for_team(team_number).await? {
            let mut active: entity::alliance_activation::ActiveModel = existing.into();
            active.alliance_id = ActiveValue::Set(alliance_id);
            active.updated_at = ActiveValue::Set(Utc::now().naive_utc());

            return active.update(self.db).await;
        }

        let activation = entity::alliance_activation::ActiveModel {
            team_number: ActiveValue::Set(team_number),
            alliance_id: ActiveValue::Set(alliance_id),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        activation.insert(self.db).await
    }
}
