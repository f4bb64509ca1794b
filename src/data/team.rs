use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::data::owner_eq;

pub struct TeamRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TeamRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        owner_number: Option<i32>,
        team_number: i32,
        name: Option<String>,
        location: Option<String>,
    ) -> Result<entity::scout_team::Model, DbErr> {
        let team = entity::scout_team::ActiveModel {
            owner_number: ActiveValue::Set(owner_number),
            team_number: ActiveValue::Set(team_number),
            name: ActiveValue::Set(name),
            location: ActiveValue::Set(location),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        team.insert(self.db).await
    }

    pub async fn get_by_number(
        &self,
        owner_number: Option<i32>,
        team_number: i32,
    ) -> Result<Option<entity::scout_team::Model>, DbErr> {
        entity::prelude::ScoutTeam::find()
            .filter(owner_eq(entity::scout_team::Column::OwnerNumber, owner_number))
            .filter(entity::scout_team::Column::TeamNumber.eq(team_number))
            .one(self.db)
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::scout_team::Model>, DbErr> {
        entity::prelude::ScoutTeam::find_by_id(id).one(self.db).await
    }

    pub async fn get_all_by_owner(
        &self,
        owner_number: Option<i32>,
    ) -> Result<Vec<entity::scout_team::Model>, DbErr> {
        entity::prelude::ScoutTeam::find()
            .filter(owner_eq(entity::scout_team::Column::OwnerNumber, owner_number))
            .all(self.db)
            .await
    }

    /// Fill null descriptive fields from the given values.
    pub async fn fill_missing_fields(
        &self,
        team: entity::scout_team::Model,
        name: Option<String>,
        location: Option<String>,
    ) -> Result<entity::scout_team::Model, DbErr> {
        let mut changed = false;
        let mut active: entity::scout_team::ActiveModel = team.clone().into();

        if team.name.is_none() && name.is_some() {
            active.name = ActiveValue::Set(name);
            changed = true;
        }
        if team.location.is_none() && location.is_some() {
            active.location = ActiveValue::Set(location);
            changed = true;
        }

        if !changed {
            return Ok(team);
        }

        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());
        active.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use crate::{data::team::TeamRepository, util::test::setup::test_setup};

    /// Team numbers are unique per tenant, not globally
    #[tokio::test]
    async fn team_number_scoped_to_tenant() -> Result<(), DbErr> {
        let test = test_setup().await;
        let team_repo = TeamRepository::new(&test.state.db);

        team_repo.create(Some(1111), 254, None, None).await?;
        team_repo.create(Some(2222), 254, None, None).await?;

        let duplicate = team_repo.create(Some(1111), 254, None, None).await;
        assert!(crate::data::is_unique_violation(&duplicate.unwrap_err()));

        Ok(())
    }
}
