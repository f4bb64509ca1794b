use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::json;

use crate::{
    data::{
        alliance::AllianceRepository, alliance_activation::AllianceActivationRepository,
        alliance_member::AllianceMemberRepository, event::{EventRepository, EventSeed},
        record::RecordRepository, team::TeamRepository,
    },
    error::Error,
    job::store::InMemoryJobStore,
    model::{
        app::AppState,
        domain::{MemberRole, MemberStatus, RecordKind},
    },
    push::PushGateway,
};

pub struct TestSetup {
    pub state: AppState,
}

/// Returns an [`AppState`] backed by a fresh in-memory database with the
/// full migration history applied, used across unit tests
pub async fn test_setup() -> TestSetup {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        db,
        push: PushGateway::new(),
        jobs: Arc::new(InMemoryJobStore::new()),
        job_stale_after_secs: 600,
    };

    TestSetup { state }
}

/// Inserts an alliance with the given roster. The first member is the
/// admin; every member is accepted, activated, and sharing data.
pub async fn test_setup_create_alliance(
    test: &TestSetup,
    name: &str,
    member_numbers: &[i32],
) -> Result<entity::alliance::Model, Error> {
    let alliance_repo = AllianceRepository::new(&test.state.db);
    let member_repo = AllianceMemberRepository::new(&test.state.db);
    let activation_repo = AllianceActivationRepository::new(&test.state.db);

    let alliance = alliance_repo.create(name).await?;

    for (index, team_number) in member_numbers.iter().enumerate() {
        let role = if index == 0 {
            MemberRole::Admin
        } else {
            MemberRole::Member
        };

        member_repo
            .create(alliance.id, *team_number, role, MemberStatus::Accepted)
            .await?;

        activation_repo
            .set_active(*team_number, Some(alliance.id))
            .await?;
    }

    Ok(alliance)
}

/// Inserts an event owned by the given tenant
pub async fn test_setup_create_event(
    test: &TestSetup,
    owner_number: Option<i32>,
    code: &str,
) -> Result<entity::scout_event::Model, Error> {
    let event_repo = EventRepository::new(&test.state.db);

    let seed = EventSeed {
        code: code.to_string(),
        name: Some(format!("{} Test Event", code)),
        year: Some(2026),
        ..Default::default()
    };

    Ok(event_repo.create(owner_number, &seed, 2026).await?)
}

/// Inserts a team owned by the given tenant
pub async fn test_setup_create_team(
    test: &TestSetup,
    owner_number: Option<i32>,
    team_number: i32,
) -> Result<entity::scout_team::Model, Error> {
    let team_repo = TeamRepository::new(&test.state.db);

    Ok(team_repo
        .create(owner_number, team_number, None, None)
        .await?)
}

/// Inserts a scouting record for a team, without a match reference
pub async fn test_setup_create_record(
    test: &TestSetup,
    owner_number: Option<i32>,
    kind: RecordKind,
    team_id: i32,
) -> Result<entity::scout_record::Model, Error> {
    let record_repo = RecordRepository::new(&test.state.db);

    Ok(record_repo
        .create(
            owner_number,
            kind,
            team_id,
            None,
            "test-scout",
            json!({"notes": "test"}),
        )
        .await?)
}
