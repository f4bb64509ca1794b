//! Duplicate-event reconciliation.
//!
//! Imports and historical writes can leave a tenant with several event
//! rows for the same real-world event. A reconciliation pass groups the
//! tenant's events by normalized code, keeps the most complete row of
//! each group, migrates associations over, and deletes the rest. The
//! whole pass runs in one transaction.

use std::collections::HashMap;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    data::{
        event::{EventRepository, EventSeed},
        game_match::MatchRepository,
        team::TeamRepository,
        team_event::{LinkOutcome, TeamEventRepository},
    },
    error::Error,
    model::report::MergeReport,
    service::resolver::normalize_event_code,
};

/// Weighted completeness of an event row; the reconciler keeps the
/// highest-scoring duplicate.
fn completeness_score(event: &entity::scout_event::Model) -> u32 {
    let mut score = 0;
    if event.name.is_some() {
        score += 4;
    }
    if event.start_date.is_some() {
        score += 3;
    }
    if event.end_date.is_some() {
        score += 2;
    }
    if event.location.is_some() {
        score += 2;
    }
    if event.timezone.is_some() {
        score += 1;
    }
    score
}

fn seed_from(event: &entity::scout_event::Model) -> EventSeed {
    EventSeed {
        code: event.code.clone(),
        name: event.name.clone(),
        year: Some(event.year),
        location: event.location.clone(),
        start_date: event.start_date,
        end_date: event.end_date,
        timezone: event.timezone.clone(),
    }
}

pub struct ReconcileService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReconcileService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Collapse the tenant's duplicate events. All-or-nothing: any error
    /// rolls the pass back and the report stays at zero merges.
    pub async fn reconcile_events(
        &self,
        owner_number: Option<i32>,
    ) -> Result<MergeReport, Error> {
        let txn = self.db.begin().await?;
        let mut report = MergeReport::default();

        let event_repo = EventRepository::new(&txn);
        let team_repo = TeamRepository::new(&txn);
        let link_repo = TeamEventRepository::new(&txn);
        let match_repo = MatchRepository::new(&txn);

        let mut groups: HashMap<String, Vec<entity::scout_event::Model>> = HashMap::new();
        for event in event_repo.get_all_by_owner(owner_number).await? {
            groups
                .entry(normalize_event_code(&event.code))
                .or_default()
                .push(event);
        }

        for (_, mut group) in groups {
            if group.len() < 2 {
                continue;
            }

            // Highest completeness wins; ties go to the oldest row.
            group.sort_by_key(|event| (std::cmp::Reverse(completeness_score(event)), event.id));
            let mut winner = group.remove(0);

            for loser in group {
                winner = event_repo
                    .fill_missing_fields(winner, &seed_from(&loser))
                    .await?;

                for link in link_repo.get_links_for_event(loser.id).await? {
                    if let Some(team) = team_repo.get_by_id(link.team_id).await? {
                        if link_repo.link_checked(&team, winner.id).await?
                            == LinkOutcome::DuplicateTeamNumber
                        {
                            report.skipped_links += 1;
                        }
                    }
                    link_repo.delete_link(link.id).await?;
                }

                for game_match in match_repo.get_by_event(loser.id).await? {
                    let clash = match_repo
                        .get_by_natural_key(
                            winner.id,
                            &game_match.match_type,
                            game_match.match_number,
                        )
                        .await?;

                    // The winner already has this match; the duplicate
                    // goes away with its event.
                    if clash.is_some() {
                        match_repo.delete_by_id(game_match.id).await?;
                    } else {
                        match_repo.repoint_event(game_match, winner.id).await?;
                    }
                }

                tracing::info!(
                    winner_id = winner.id,
                    loser_id = loser.id,
                    code = %winner.code,
                    "Merging duplicate event"
                );
                event_repo.delete_by_id(loser.id).await?;
                report.merged += 1;
            }
        }

        txn.commit().await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sea_orm::DbErr;

    use crate::{
        data::{
            event::{EventRepository, EventSeed},
            game_match::{MatchRepository, MatchSeed},
            team::TeamRepository,
            team_event::TeamEventRepository,
        },
        service::reconcile::ReconcileService,
        util::test::setup::test_setup,
    };

    /// The most complete duplicate survives and inherits associations
    #[tokio::test]
    async fn richest_duplicate_survives() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);
        let team_repo = TeamRepository::new(&test.state.db);
        let link_repo = TeamEventRepository::new(&test.state.db);
        let match_repo = MatchRepository::new(&test.state.db);
        let reconcile_service = ReconcileService::new(&test.state.db);

        let sparse = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: "ARLI2026".to_string(),
                    ..Default::default()
                },
                2026,
            )
            .await?;
        let rich = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: "arli2026".to_string(),
                    name: Some("Arkansas Regional".to_string()),
                    start_date: NaiveDate::from_ymd_opt(2026, 3, 4),
                    timezone: Some("America/Chicago".to_string()),
                    ..Default::default()
                },
                2026,
            )
            .await?;

        let team = team_repo.create(Some(1111), 254, None, None).await?;
        link_repo.link_checked(&team, sparse.id).await?;
        match_repo
            .upsert_by_natural_key(Some(1111), sparse.id, "qualification", 1, &MatchSeed::default())
            .await?;

        let report = reconcile_service.reconcile_events(Some(1111)).await.unwrap();
        assert_eq!(report.merged, 1);
        assert_eq!(report.skipped_links, 0);

        let remaining = event_repo.get_all_by_owner(Some(1111)).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, rich.id);

        let teams = link_repo.teams_on_event(rich.id).await?;
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team_number, 254);

        let matches = match_repo.get_by_event(rich.id).await?;
        assert_eq!(matches.len(), 1);

        Ok(())
    }

    /// A link whose team number already exists on the winner is dropped
    /// and counted, not duplicated
    #[tokio::test]
    async fn clashing_links_are_skipped() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);
        let team_repo = TeamRepository::new(&test.state.db);
        let link_repo = TeamEventRepository::new(&test.state.db);
        let reconcile_service = ReconcileService::new(&test.state.db);

        let winner = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: "ARLI2026".to_string(),
                    name: Some("Arkansas Regional".to_string()),
                    ..Default::default()
                },
                2026,
            )
            .await?;
        let loser = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: "arli2026 ".to_string(),
                    ..Default::default()
                },
                2026,
            )
            .await?;

        // Two team rows for the same real-world team number
        let team_a = team_repo.create(Some(1111), 254, None, None).await?;
        let team_b = team_repo.create(None, 254, None, None).await?;
        link_repo.link_checked(&team_a, winner.id).await?;
        link_repo.link_checked(&team_b, loser.id).await?;

        let report = reconcile_service.reconcile_events(Some(1111)).await.unwrap();
        assert_eq!(report.merged, 1);
        assert_eq!(report.skipped_links, 1);

        let teams = link_repo.teams_on_event(winner.id).await?;
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].id, team_a.id);

        Ok(())
    }

    /// Winner matches collide with loser matches by natural key; the
    /// duplicates are deleted rather than repointed
    #[tokio::test]
    async fn colliding_matches_are_dropped() -> Result<(), DbErr> {
        let test = test_setup().await;
        let event_repo = EventRepository::new(&test.state.db);
        let match_repo = MatchRepository::new(&test.state.db);
        let reconcile_service = ReconcileService::new(&test.state.db);

        let winner = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: "ARLI2026".to_string(),
                    name: Some("Arkansas Regional".to_string()),
                    ..Default::default()
                },
                2026,
            )
            .await?;
        let loser = event_repo
            .create(
                Some(1111),
                &EventSeed {
                    code: " arli2026".to_string(),
                    ..Default::default()
                },
                2026,
            )
            .await?;

        match_repo
            .upsert_by_natural_key(Some(1111), winner.id, "qualification", 1, &MatchSeed::default())
            .await?;
        match_repo
            .upsert_by_natural_key(Some(1111), loser.id, "qualification", 1, &MatchSeed::default())
            .await?;
        match_repo
            .upsert_by_natural_key(Some(1111), loser.id, "qualification", 2, &MatchSeed::default())
            .await?;

        let report = reconcile_service.reconcile_events(Some(1111)).await.unwrap();
        assert_eq!(report.merged, 1);

        let matches = match_repo.get_by_event(winner.id).await?;
        assert_eq!(matches.len(), 2);

        Ok(())
    }
}
