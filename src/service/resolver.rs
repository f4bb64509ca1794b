//! Natural-key resolution for events.
//!
//! Events arrive from many paths (foreground writes, imported archives,
//! alliance payloads) identified only by code and descriptive fields, so
//! creation has to be idempotent. Insert races are resolved by re-running
//! the lookup against the committed winner rather than by locking.

use chrono::{Datelike, Utc};
use sea_orm::ConnectionTrait;

use crate::{
    data::{
        event::{EventRepository, EventSeed},
        find_or_create,
    },
    error::Error,
};

/// Canonical event code form used for lookups, storage and shared-event
/// lists alike.
pub fn normalize_event_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub struct EventResolver<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventResolver<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Find or create the tenant's event for the given seed.
    ///
    /// Lookup order: normalized code, then (name, year). A hit gets its
    /// null descriptive fields opportunistically filled from the seed. The
    /// stored year comes from the seed, else the start date, else the
    /// current year; it is never null.
    pub async fn resolve(
        &self,
        owner_number: Option<i32>,
        seed: &EventSeed,
    ) -> Result<entity::scout_event::Model, Error> {
        let event_repo = EventRepository::new(self.db);

        let mut seed = seed.clone();
        seed.code = normalize_event_code(&seed.code);
        let year = seed
            .year
            .or_else(|| seed.start_date.map(|date| date.year()))
            .unwrap_or_else(|| Utc::now().year());
        seed.year = Some(year);

        let lookup = || async {
            if let Some(found) = event_repo.get_by_code(owner_number, &seed.code).await? {
                return Ok(Some(found));
            }
            if let Some(name) = seed.name.as_deref() {
                if let Some(found) = event_repo
                    .get_by_name_and_year(owner_number, name, year)
                    .await?
                {
                    return Ok(Some(found));
                }
            }
            Ok(None)
        };

        let event = find_or_create(lookup, || event_repo.create(owner_number, &seed, year)).await?;

        Ok(event_repo.fill_missing_fields(event, &seed).await?)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use crate::{
        data::event::{EventRepository, EventSeed},
        service::resolver::{normalize_event_code, EventResolver},
        util::test::setup::test_setup,
    };

    /// Codes are matched after trimming and uppercasing
    #[tokio::test]
    async fn resolve_normalizes_code() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = EventResolver::new(&test.state.db);

        let first = resolver
            .resolve(
                Some(1111),
                &EventSeed {
                    code: " evtx ".to_string(),
                    year: Some(2026),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let second = resolver
            .resolve(
                Some(1111),
                &EventSeed {
                    code: "EVTX".to_string(),
                    year: Some(2026),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.code, "EVTX");
        assert_eq!(normalize_event_code("  arli2026 "), "ARLI2026");

        Ok(())
    }

    /// A code miss still matches an existing event by name and year
    #[tokio::test]
    async fn resolve_falls_back_to_name_and_year() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = EventResolver::new(&test.state.db);
        let event_repo = EventRepository::new(&test.state.db);

        let existing = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: "ARLI".to_string(),
                    name: Some("Arkansas Regional".to_string()),
                    ..Default::default()
                },
                2026,
            )
            .await?;

        let resolved = resolver
            .resolve(
                Some(1111),
                &EventSeed {
                    code: "ARKANSAS".to_string(),
                    name: Some("Arkansas Regional".to_string()),
                    year: Some(2026),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(resolved.id, existing.id);

        Ok(())
    }

    /// A hit fills null fields without overwriting populated ones
    #[tokio::test]
    async fn resolve_backfills_missing_fields() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = EventResolver::new(&test.state.db);

        resolver
            .resolve(
                Some(1111),
                &EventSeed {
                    code: "EVTX".to_string(),
                    year: Some(2026),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let enriched = resolver
            .resolve(
                Some(1111),
                &EventSeed {
                    code: "EVTX".to_string(),
                    year: Some(2026),
                    location: Some("Searcy, AR".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(enriched.location.as_deref(), Some("Searcy, AR"));

        Ok(())
    }

    /// Concurrent resolves of one seed converge on a single row
    #[tokio::test]
    async fn concurrent_resolves_create_one_row() -> Result<(), DbErr> {
        let test = test_setup().await;
        let resolver = EventResolver::new(&test.state.db);

        let seed = EventSeed {
            code: "EVTX".to_string(),
            year: Some(2026),
            ..Default::default()
        };

        let (a, b, c) = tokio::join!(
            resolver.resolve(Some(1111), &seed),
            resolver.resolve(Some(1111), &seed),
            resolver.resolve(Some(1111), &seed),
        );

        let id = a.unwrap().id;
        assert_eq!(b.unwrap().id, id);
        assert_eq!(c.unwrap().id, id);

        let all = EventRepository::new(&test.state.db)
            .get_all_by_owner(Some(1111))
            .await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }
}
