use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{data::owner_eq, service::scope::TenantScope};

/// Descriptive fields for an event, as supplied by a write path or an
/// imported archive. `code` is normalized by the caller before lookup.
#[derive(Clone, Debug, Default)]
pub struct EventSeed {
    pub code: String,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub timezone: Option<String>,
}

pub struct EventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        owner_number: Option<i32>,
        seed: &EventSeed,
        year: i32,
    ) -> Result<entity::scout_event::Model, DbErr> {
        let event = entity::scout_event::ActiveModel {
            owner_number: ActiveValue::Set(owner_number),
            code: ActiveValue::Set(seed.code.clone()),
            name: ActiveValue::Set(seed.name.clone()),
            year: ActiveValue::Set(year),
            location: ActiveValue::Set(seed.location.clone()),
            start_date: ActiveValue::Set(seed.start_date),
            end_date: ActiveValue::Set(seed.end_date),
            timezone: ActiveValue::Set(seed.timezone.clone()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        event.insert(self.db).await
    }

    /// Latest event with the given normalized code for the tenant.
    pub async fn get_by_code(
        &self,
        owner_number: Option<i32>,
        code: &str,
    ) -> Result<Option<entity::scout_event::Model>, DbErr> {
        entity::prelude::ScoutEvent::find()
            .filter(owner_eq(entity::scout_event::Column::OwnerNumber, owner_number))
            .filter(entity::scout_event::Column::Code.eq(code))
            .order_by_desc(entity::scout_event::Column::Year)
            .one(self.db)
            .await
    }

    pub async fn get_by_name_and_year(
        &self,
        owner_number: Option<i32>,
        name: &str,
        year: i32,
    ) -> Result<Option<entity::scout_event::Model>, DbErr> {
        entity::prelude::ScoutEvent::find()
            .filter(owner_eq(entity::scout_event::Column::OwnerNumber, owner_number))
            .filter(entity::scout_event::Column::Name.eq(name))
            .filter(entity::scout_event::Column::Year.eq(year))
            .one(self.db)
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::scout_event::Model>, DbErr> {
        entity::prelude::ScoutEvent::find_by_id(id).one(self.db).await
    }

    pub async fn get_all_by_owner(
        &self,
        owner_number: Option<i32>,
    ) -> Result<Vec<entity::scout_event::Model>, DbErr> {
        entity::prelude::ScoutEvent::find()
            .filter(owner_eq(entity::scout_event::Column::OwnerNumber, owner_number))
            .all(self.db)
            .await
    }

    /// Events visible to the resolved scope. With an active alliance the
    /// filter widens to every member tenant, restricted to the shared
    /// event codes.
    pub async fn get_in_scope(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<entity::scout_event::Model>, DbErr> {
        let mut owner_filter = Condition::any().add(
            entity::scout_event::Column::OwnerNumber
                .is_in(scope.visible_numbers.iter().copied()),
        );
        if scope.include_legacy {
            owner_filter = owner_filter.add(entity::scout_event::Column::OwnerNumber.is_null());
        }

        let mut query = entity::prelude::ScoutEvent::find().filter(owner_filter);

        if !scope.shared_event_codes.is_empty() {
            query = query.filter(
                entity::scout_event::Column::Code
                    .is_in(scope.shared_event_codes.iter().cloned()),
            );
        }

        query.all(self.db).await
    }

    /// Fill any null descriptive field of an existing row from the seed.
    /// Returns the refreshed model; a no-op when nothing is missing.
    pub async fn fill_missing_fields(
        &self,
        event: entity::scout_event::Model,
        seed: &EventSeed,
    ) -> Result<entity::scout_event::Model, DbErr> {
        let mut changed = false;
        let mut active: entity::scout_event::ActiveModel = event.clone().into();

        if event.name.is_none() && seed.name.is_some() {
            active.name = ActiveValue::Set(seed.name.clone());
            changed = true;
        }
        if event.location.is_none() && seed.location.is_some() {
            active.location = ActiveValue::Set(seed.location.clone());
            changed = true;
        }
        if event.start_date.is_none() && seed.start_date.is_some() {
            active.start_date = ActiveValue::Set(seed.start_date);
            changed = true;
        }
        if event.end_date.is_none() && seed.end_date.is_some() {
            active.end_date = ActiveValue::Set(seed.end_date);
            changed = true;
        }
        if event.timezone.is_none() && seed.timezone.is_some() {
            active.timezone = ActiveValue::Set(seed.timezone.clone());
            changed = true;
        }

        if !changed {
            return Ok(event);
        }

        active.updated_at = ActiveValue::Set(Utc::now().naive_utc());
        active.update(self.db).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::ScoutEvent::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use crate::{
        data::event::{EventRepository, EventSeed},
        service::scope::TenantScope,
        util::test::setup::{test_setup, test_setup_create_event},
    };

    fn seed(code: &str) -> EventSeed {
        EventSeed {
            code: code.to_string(),
            name: Some("Test Event".to_string()),
            year: Some(2026),
            ..Default::default()
        }
    }

    /// Lookup by code returns the row for the owning tenant only
    #[tokio::test]
    async fn get_by_code_is_tenant_scoped() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);

        event_repo.create(Some(1111), &seed("EVTX"), 2026).await?;

        let found = event_repo.get_by_code(Some(1111), "EVTX").await?;
        assert!(found.is_some());

        let other_tenant = event_repo.get_by_code(Some(2222), "EVTX").await?;
        assert!(other_tenant.is_none());

        Ok(())
    }

    /// Null descriptive fields are filled from the seed; set fields stay
    #[tokio::test]
    async fn fill_missing_fields_preserves_existing() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);

        let sparse = EventSeed {
            code: "EVTX".to_string(),
            name: Some("Original Name".to_string()),
            ..Default::default()
        };
        let created = event_repo.create(Some(1111), &sparse, 2026).await?;
        assert!(created.location.is_none());

        let richer = EventSeed {
            code: "EVTX".to_string(),
            name: Some("Different Name".to_string()),
            location: Some("Little Rock, AR".to_string()),
            ..Default::default()
        };
        let updated = event_repo.fill_missing_fields(created, &richer).await?;

        assert_eq!(updated.name.as_deref(), Some("Original Name"));
        assert_eq!(updated.location.as_deref(), Some("Little Rock, AR"));

        Ok(())
    }

    /// Solo scope sees only the tenant's own rows; the legacy option also
    /// matches rows that predate owner stamping
    #[tokio::test]
    async fn get_in_scope_honors_legacy_rows() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);

        test_setup_create_event(&test, Some(1111), "EVTX").await.unwrap();
        test_setup_create_event(&test, Some(2222), "OTHER").await.unwrap();
        test_setup_create_event(&test, None, "LEGACY").await.unwrap();

        let solo = TenantScope::solo(1111);
        let visible = event_repo.get_in_scope(&solo).await?;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].code, "EVTX");

        let with_legacy = TenantScope::solo(1111).with_legacy();
        let mut codes: Vec<String> = event_repo
            .get_in_scope(&with_legacy)
            .await?
            .into_iter()
            .map(|event| event.code)
            .collect();
        codes.sort();
        assert_eq!(codes, vec!["EVTX".to_string(), "LEGACY".to_string()]);

        Ok(())
    }

    /// The natural-key unique index rejects a duplicate (owner, code, year)
    #[tokio::test]
    async fn duplicate_natural_key_is_rejected() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);

        event_repo.create(Some(1111), &seed("EVTX"), 2026).await?;
        let result = event_repo.create(Some(1111), &seed("EVTX"), 2026).await;

        assert!(crate::data::is_unique_violation(&result.unwrap_err()));

        Ok(())
    }
}
