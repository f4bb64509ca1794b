use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

pub struct AllianceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AllianceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, name: &str) -> Result<entity::alliance::Model, DbErr> {
        let alliance = entity::alliance::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        alliance.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::alliance::Model>, DbErr> {
        entity::prelude::Alliance::find_by_id(id).one(self.db).await
    }

    pub async fn get_shared_event_codes(&self, alliance_id: i32) -> Result<Vec<String>, DbErr> {
        Ok(entity::prelude::AllianceSharedEvent::find()
            .filter(entity::alliance_shared_event::Column::AllianceId.eq(alliance_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| row.event_code)
            .collect())
    }

    /// Replace the alliance's shared event code list. Codes are normalized
    /// to uppercase by the service layer before reaching here.
    pub async fn set_shared_event_codes(
        &self,
        alliance_id: i32,
        event_codes: &[String],
    ) -> Result<(), DbErr> {
        entity::prelude::AllianceSharedEvent::delete_many()
            .filter(entity::alliance_shared_event::Column::AllianceId.eq(alliance_id))
            .exec(self.db)
            .await?;

        for code in event_codes {
            let row = entity::alliance_shared_event::ActiveModel {
                alliance_id: ActiveValue::Set(alliance_id),
                event_code: ActiveValue::Set(code.clone()),
                ..Default::default()
            };
            row.insert(self.db).await?;
        }

        Ok(())
    }
}
