//! Portable archive import.
//!
//! Identity is rebuilt from natural keys, never from the archive's
//! numeric ids; those only feed per-run `old id -> new id` maps so later
//! groups can resolve references. Each entity group runs in its own
//! transaction and a failed group is rolled back and reported without
//! aborting the rest of the run, so re-running a partially failed import
//! is always safe.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde_json::Value;

use crate::{
    data::{
        event::{EventRepository, EventSeed},
        game_match::{MatchRepository, MatchSeed},
        pick_list::PickListRepository,
        record::RecordRepository,
        share_link::ShareLinkRepository,
        team::TeamRepository,
        team_event::{LinkOutcome, TeamEventRepository},
    },
    error::Error,
    model::{
        domain::{PickListKind, RecordKind, ShareLinkKind},
        report::ImportReport,
    },
    service::{
        migrate::{
            archive::{
                read_archive, Archive, ExportedEvent, ExportedLineup, ExportedMatch,
                ExportedPickListEntry, ExportedRecord, ExportedShareLink, ExportedTeam,
                ExportedTeamEvent,
            },
            entry,
        },
        resolver::{normalize_event_code, EventResolver},
    },
};

/// Event rows with no resolvable reference are attached to one shared
/// placeholder event per import run.
const PLACEHOLDER_EVENT_CODE: &str = "IMPORT-MISSING";
const PLACEHOLDER_EVENT_NAME: &str = "Imported (Missing Event)";

/// Field-level merge that never lets an incoming null erase existing
/// data. Non-object payloads fall back to replace-if-non-null.
pub fn merge_payload_conservative(existing: &Value, incoming: &Value) -> Value {
    match (existing, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            let mut merged = existing.clone();
            for (field, value) in incoming {
                if !value.is_null() {
                    merged.insert(field.clone(), value.clone());
                }
            }
            Value::Object(merged)
        }
        (existing, Value::Null) => existing.clone(),
        (_, incoming) => incoming.clone(),
    }
}

#[derive(Default)]
struct IdMaps {
    events: HashMap<i32, i32>,
    event_codes: HashMap<String, i32>,
    teams: HashMap<i32, i32>,
    matches: HashMap<i32, i32>,
    placeholder_event: Option<i32>,
}

pub struct ImportService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ImportService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run a full archive import into the tenant. A bad container aborts;
    /// anything past parsing is accumulated into the report.
    pub async fn import(
        &self,
        owner_number: Option<i32>,
        bytes: &[u8],
    ) -> Result<ImportReport, Error> {
        let archive = read_archive(bytes)?;

        let mut report = ImportReport::default();
        let mut maps = IdMaps::default();

        self.run_group(&mut report, entry::EVENTS, {
            self.import_events(&archive, owner_number, &mut maps)
        })
        .await;
        self.run_group(&mut report, entry::TEAMS, {
            self.import_teams(&archive, owner_number, &mut maps)
        })
        .await;
        self.run_group(&mut report, entry::TEAM_EVENT, {
            self.import_links(&archive, &maps)
        })
        .await;
        self.run_group(&mut report, entry::MATCHES, {
            self.import_matches(&archive, owner_number, &mut maps)
        })
        .await;
        self.run_group(&mut report, entry::ALLIANCES, {
            self.import_lineups(&archive, owner_number, &maps)
        })
        .await;

        for (kind, name) in [
            (RecordKind::Scouting, entry::SCOUTING_DATA),
            (RecordKind::Pit, entry::PIT_SCOUTING),
            (RecordKind::Qualitative, entry::STRATEGY_DRAWINGS),
        ] {
            self.run_group(&mut report, name, {
                self.import_records(&archive, owner_number, &maps, kind, name)
            })
            .await;
        }

        for (kind, name) in [
            (PickListKind::DoNotPick, entry::DO_NOT_PICK),
            (PickListKind::Avoid, entry::AVOID),
        ] {
            self.run_group(&mut report, name, {
                self.import_pick_lists(&archive, owner_number, kind, name)
            })
            .await;
        }

        for (kind, name) in [
            (ShareLinkKind::Graph, entry::SHARED_GRAPHS),
            (ShareLinkKind::TeamRanks, entry::SHARED_TEAM_RANKS),
        ] {
            self.run_group(&mut report, name, {
                self.import_share_links(&archive, owner_number, kind, name)
            })
            .await;
        }

        Ok(report)
    }

    /// Fold a group's outcome into the run report. A failed group was
    /// rolled back; only its error survives.
    async fn run_group<F>(&self, report: &mut ImportReport, name: &str, group: F)
    where
        F: std::future::Future<Output = Result<ImportReport, Error>>,
    {
        match group.await {
            Ok(group_report) => report.absorb(group_report),
            Err(err) => {
                tracing::warn!(group = %name, "Import group failed: {}", err);
                report.error(format!("{}: {}", name, err));
            }
        }
    }

    async fn import_events(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        maps: &mut IdMaps,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let event_repo = EventRepository::new(&txn);
        let event_resolver = EventResolver::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(entry::EVENTS) {
            let exported: ExportedEvent = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, entry::EVENTS, &reason);
                    continue;
                }
            };

            let code = normalize_event_code(&exported.code);
            let year = exported
                .year
                .or_else(|| exported.start_date.map(|date| date.year()))
                .unwrap_or_else(|| Utc::now().year());

            let mut existing = event_repo.get_by_code(owner_number, &code).await?;
            if existing.is_none() {
                if let Some(name) = exported.name.as_deref() {
                    existing = event_repo
                        .get_by_name_and_year(owner_number, name, year)
                        .await?;
                }
            }
            let found = existing.is_some();

            let resolved = event_resolver
                .resolve(
                    owner_number,
                    &EventSeed {
                        code: code.clone(),
                        name: exported.name.clone(),
                        year: Some(year),
                        location: exported.location.clone(),
                        start_date: exported.start_date,
                        end_date: exported.end_date,
                        timezone: exported.timezone.clone(),
                    },
                )
                .await?;

            if found {
                report.updated(entry::EVENTS);
            } else {
                report.created(entry::EVENTS);
            }
            maps.events.insert(exported.id, resolved.id);
            maps.event_codes.insert(code, resolved.id);
        }

        txn.commit().await?;
        Ok(report)
    }

    async fn import_teams(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        maps: &mut IdMaps,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let team_repo = TeamRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(entry::TEAMS) {
            let exported: ExportedTeam = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, entry::TEAMS, &reason);
                    continue;
                }
            };

            let team = match team_repo
                .get_by_number(owner_number, exported.team_number)
                .await?
            {
                Some(existing) => {
                    let filled = team_repo
                        .fill_missing_fields(existing, exported.name.clone(), exported.location.clone())
                        .await?;
                    report.updated(entry::TEAMS);
                    filled
                }
                None => {
                    let created = team_repo
                        .create(
                            owner_number,
                            exported.team_number,
                            exported.name.clone(),
                            exported.location.clone(),
                        )
                        .await?;
                    report.created(entry::TEAMS);
                    created
                }
            };

            maps.teams.insert(exported.id, team.id);
        }

        txn.commit().await?;
        Ok(report)
    }

    async fn import_links(
        &self,
        archive: &Archive,
        maps: &IdMaps,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let team_repo = TeamRepository::new(&txn);
        let link_repo = TeamEventRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(entry::TEAM_EVENT) {
            let exported: ExportedTeamEvent = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, entry::TEAM_EVENT, &reason);
                    continue;
                }
            };

            let (Some(team_id), Some(event_id)) = (
                maps.teams.get(&exported.team_id).copied(),
                maps.events.get(&exported.event_id).copied(),
            ) else {
                report.skipped(entry::TEAM_EVENT);
                continue;
            };
            let Some(team) = team_repo.get_by_id(team_id).await? else {
                report.skipped(entry::TEAM_EVENT);
                continue;
            };

            match link_repo.link_checked(&team, event_id).await? {
                LinkOutcome::Linked => report.created(entry::TEAM_EVENT),
                LinkOutcome::AlreadyLinked => report.skipped(entry::TEAM_EVENT),
                LinkOutcome::DuplicateTeamNumber => {
                    report.skipped(entry::TEAM_EVENT);
                    report.error(format!(
                        "team_event: team {} already present on event {} under another row",
                        team.team_number, event_id
                    ));
                }
            }
        }

        txn.commit().await?;
        Ok(report)
    }

    async fn import_matches(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        maps: &mut IdMaps,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let match_repo = MatchRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(entry::MATCHES) {
            let exported: ExportedMatch = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, entry::MATCHES, &reason);
                    continue;
                }
            };

            let event_id = match self.resolve_match_event(&txn, owner_number, &exported, maps).await? {
                Some(event_id) => event_id,
                None => {
                    self.placeholder_event(&txn, owner_number, maps).await?
                }
            };

            let (game_match, created) = match_repo
                .upsert_by_natural_key(
                    owner_number,
                    event_id,
                    &exported.match_type,
                    exported.match_number,
                    &MatchSeed {
                        red_alliance: exported.red_alliance.clone(),
                        blue_alliance: exported.blue_alliance.clone(),
                        red_score: exported.red_score,
                        blue_score: exported.blue_score,
                    },
                )
                .await?;

            if created {
                report.created(entry::MATCHES);
            } else {
                report.updated(entry::MATCHES);
            }
            maps.matches.insert(exported.id, game_match.id);
        }

        txn.commit().await?;
        Ok(report)
    }

    /// Lineup rows only enrich matches the match group already mapped.
    async fn import_lineups(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        maps: &IdMaps,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let match_repo = MatchRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(entry::ALLIANCES) {
            let exported: ExportedLineup = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, entry::ALLIANCES, &reason);
                    continue;
                }
            };

            let mapped = maps
                .matches
                .get(&exported.match_id)
                .copied();
            let Some(game_match) = (match mapped {
                Some(id) => match_repo.get_by_id(id).await?,
                None => None,
            }) else {
                report.skipped(entry::ALLIANCES);
                continue;
            };

            match_repo
                .upsert_by_natural_key(
                    owner_number,
                    game_match.event_id,
                    &game_match.match_type,
                    game_match.match_number,
                    &MatchSeed {
                        red_alliance: exported.red_alliance.clone(),
                        blue_alliance: exported.blue_alliance.clone(),
                        red_score: None,
                        blue_score: None,
                    },
                )
                .await?;
            report.updated(entry::ALLIANCES);
        }

        txn.commit().await?;
        Ok(report)
    }

    async fn import_records(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        maps: &IdMaps,
        kind: RecordKind,
        name: &str,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let record_repo = RecordRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(name) {
            let exported: ExportedRecord = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, name, &reason);
                    continue;
                }
            };

            let Some(team_id) = maps.teams.get(&exported.team_id).copied() else {
                report.skipped(name);
                continue;
            };

            let match_id = match exported.match_id {
                Some(old_id) => match maps.matches.get(&old_id).copied() {
                    Some(new_id) => Some(new_id),
                    None => {
                        report.skipped(name);
                        continue;
                    }
                },
                None => None,
            };
            if kind == RecordKind::Scouting && match_id.is_none() {
                report.skipped(name);
                continue;
            }

            match record_repo
                .get_by_natural_key(owner_number, kind, team_id, match_id)
                .await?
            {
                Some(existing) => {
                    let merged = merge_payload_conservative(&existing.payload, &exported.payload);
                    record_repo.update_payload(existing, merged).await?;
                    report.updated(name);
                }
                None => {
                    record_repo
                        .create(
                            owner_number,
                            kind,
                            team_id,
                            match_id,
                            exported.scout_name.as_deref().unwrap_or("imported"),
                            exported.payload.clone(),
                        )
                        .await?;
                    report.created(name);
                }
            }
        }

        txn.commit().await?;
        Ok(report)
    }

    async fn import_pick_lists(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        kind: PickListKind,
        name: &str,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let pick_list_repo = PickListRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(name) {
            let exported: ExportedPickListEntry = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, name, &reason);
                    continue;
                }
            };

            let (_, created) = pick_list_repo
                .upsert(owner_number, kind, exported.team_number, exported.reason.clone())
                .await?;

            if created {
                report.created(name);
            } else {
                report.updated(name);
            }
        }

        txn.commit().await?;
        Ok(report)
    }

    async fn import_share_links(
        &self,
        archive: &Archive,
        owner_number: Option<i32>,
        kind: ShareLinkKind,
        name: &str,
    ) -> Result<ImportReport, Error> {
        let txn = self.db.begin().await?;
        let share_link_repo = ShareLinkRepository::new(&txn);
        let mut report = ImportReport::default();

        for row in archive.rows(name) {
            let exported: ExportedShareLink = match parse_row(row) {
                Ok(exported) => exported,
                Err(reason) => {
                    skip_bad_row(&mut report, name, &reason);
                    continue;
                }
            };

            let (_, created) = share_link_repo
                .upsert_by_share_id(&exported.share_id, kind, owner_number, exported.payload.clone())
                .await?;

            if created {
                report.created(name);
            } else {
                report.updated(name);
            }
        }

        txn.commit().await?;
        Ok(report)
    }

    /// Resolve a match's event reference: the numeric id map first, then
    /// the normalized-code map, then a live code lookup for events that
    /// exist locally without appearing in the archive.
    async fn resolve_match_event<C: ConnectionTrait>(
        &self,
        txn: &C,
        owner_number: Option<i32>,
        exported: &ExportedMatch,
        maps: &mut IdMaps,
    ) -> Result<Option<i32>, Error> {
        if let Some(event_id) = maps.events.get(&exported.event_id).copied() {
            return Ok(Some(event_id));
        }

        let Some(code) = exported.event_code.as_deref() else {
            return Ok(None);
        };
        let code = normalize_event_code(code);

        if let Some(event_id) = maps.event_codes.get(&code).copied() {
            return Ok(Some(event_id));
        }

        let found = EventRepository::new(txn)
            .get_by_code(owner_number, &code)
            .await?;
        if let Some(event) = &found {
            maps.event_codes.insert(code, event.id);
        }

        Ok(found.map(|event| event.id))
    }

    /// Lazily create the run's shared placeholder event for orphaned
    /// references.
    async fn placeholder_event<C: ConnectionTrait>(
        &self,
        txn: &C,
        owner_number: Option<i32>,
        maps: &mut IdMaps,
    ) -> Result<i32, Error> {
        if let Some(id) = maps.placeholder_event {
            return Ok(id);
        }

        let placeholder = EventResolver::new(txn)
            .resolve(
                owner_number,
                &EventSeed {
                    code: PLACEHOLDER_EVENT_CODE.to_string(),
                    name: Some(PLACEHOLDER_EVENT_NAME.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        maps.placeholder_event = Some(placeholder.id);
        Ok(placeholder.id)
    }
}

fn parse_row<T: serde::de::DeserializeOwned>(row: &Value) -> Result<T, String> {
    serde_json::from_value(row.clone()).map_err(|err| err.to_string())
}

fn skip_bad_row(report: &mut ImportReport, name: &str, reason: &str) {
    report.skipped(name);
    report.error(format!("{}: unparseable row: {}", name, reason));
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        data::{
            event::{EventRepository, EventSeed},
            game_match::MatchRepository,
            record::RecordRepository,
            team_event::TeamEventRepository,
        },
        model::domain::{DedupPreference, RecordKind},
        service::{
            migrate::{
                export::ExportService,
                import::{merge_payload_conservative, ImportService},
            },
            replication::ReplicationService,
        },
        util::test::setup::test_setup,
    };

    /// Incoming nulls never erase, non-nulls always land, new fields are
    /// added
    #[test]
    fn conservative_merge_keeps_existing_over_null() {
        let merged = merge_payload_conservative(
            &json!({"a": 1, "b": 2}),
            &json!({"a": null, "b": 3, "c": 4}),
        );

        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
    }

    async fn seed_tenant(test: &crate::util::test::setup::TestSetup, team_number: i32) {
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        replication_service
            .submit_record(
                team_number,
                crate::model::api::SubmitRecordDto {
                    kind: RecordKind::Scouting,
                    team_number: 254,
                    event_code: "EVTX".to_string(),
                    match_type: Some("qualification".to_string()),
                    match_number: Some(1),
                    scout_name: "scout-a".to_string(),
                    payload: json!({"auto_points": 12}),
                },
            )
            .await
            .unwrap();
        replication_service
            .submit_record(
                team_number,
                crate::model::api::SubmitRecordDto {
                    kind: RecordKind::Pit,
                    team_number: 254,
                    event_code: "EVTX".to_string(),
                    match_type: None,
                    match_number: None,
                    scout_name: "scout-b".to_string(),
                    payload: json!({"drivetrain": "swerve"}),
                },
            )
            .await
            .unwrap();
    }

    /// Export tenant A, import into empty tenant B, re-import: second run
    /// creates nothing
    #[tokio::test]
    async fn reimport_is_idempotent() {
        let test = test_setup().await;
        let export_service = ExportService::new(&test.state.db);
        let import_service = ImportService::new(&test.state.db);

        seed_tenant(&test, 1111).await;
        let archive = export_service.export(Some(1111)).await.unwrap();

        let first = import_service.import(Some(2222), &archive).await.unwrap();
        assert!(first.errors.is_empty(), "errors: {:?}", first.errors);
        assert_eq!(first.created_count("events"), 1);
        assert_eq!(first.created_count("teams"), 1);
        assert_eq!(first.created_count("team_event"), 1);
        assert_eq!(first.created_count("matches"), 1);
        assert_eq!(first.created_count("scouting_data"), 1);
        assert_eq!(first.created_count("pit_scouting"), 1);

        let second = import_service.import(Some(2222), &archive).await.unwrap();
        assert!(second.errors.is_empty(), "errors: {:?}", second.errors);
        let total_created: usize = second.created.values().sum();
        assert_eq!(total_created, 0);
        assert!(second.updated_count("scouting_data") > 0);

        // The original tenant is untouched
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);
        let records = replication_service
            .list_records(1111, None, DedupPreference::PreferLocal)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    /// A match referencing an event missing from the archive lands on the
    /// shared placeholder event
    #[tokio::test]
    async fn orphan_match_gets_placeholder_event() {
        let test = test_setup().await;
        let import_service = ImportService::new(&test.state.db);
        let event_repo = EventRepository::new(&test.state.db);
        let match_repo = MatchRepository::new(&test.state.db);

        let bundle = json!({
            "matches": [
                {"id": 10, "event_id": 999, "match_type": "qualification", "match_number": 1},
                {"id": 11, "event_id": 999, "match_type": "qualification", "match_number": 2},
            ],
        });

        let report = import_service
            .import(Some(2222), &serde_json::to_vec(&bundle).unwrap())
            .await
            .unwrap();
        assert_eq!(report.created_count("matches"), 2);

        let placeholder = event_repo
            .get_by_code(Some(2222), "IMPORT-MISSING")
            .await
            .unwrap()
            .expect("placeholder event");
        assert_eq!(
            placeholder.name.as_deref(),
            Some("Imported (Missing Event)")
        );
        assert_eq!(match_repo.get_by_event(placeholder.id).await.unwrap().len(), 2);
    }

    /// A match whose numeric event id never mapped still lands on the
    /// right event through its code, not on the placeholder
    #[tokio::test]
    async fn match_event_resolves_by_code_when_id_unmapped() {
        let test = test_setup().await;
        let import_service = ImportService::new(&test.state.db);
        let event_repo = EventRepository::new(&test.state.db);
        let match_repo = MatchRepository::new(&test.state.db);

        let existing = event_repo
            .create(
                Some(2222),
                &EventSeed {
                    code: "EVTX".to_string(),
                    year: Some(2026),
                    ..Default::default()
                },
                2026,
            )
            .await
            .unwrap();

        let bundle = json!({
            "matches": [
                {"id": 10, "event_id": 999, "event_code": "evtx",
                 "match_type": "qualification", "match_number": 1},
            ],
        });

        let report = import_service
            .import(Some(2222), &serde_json::to_vec(&bundle).unwrap())
            .await
            .unwrap();
        assert_eq!(report.created_count("matches"), 1);

        assert_eq!(match_repo.get_by_event(existing.id).await.unwrap().len(), 1);
        assert!(event_repo
            .get_by_code(Some(2222), "IMPORT-MISSING")
            .await
            .unwrap()
            .is_none());
    }

    /// Records whose team or match never mapped are counted skipped, not
    /// errored
    #[tokio::test]
    async fn unmapped_record_dependencies_are_skipped() {
        let test = test_setup().await;
        let import_service = ImportService::new(&test.state.db);

        let bundle = json!({
            "teams": [{"id": 1, "team_number": 254}],
            "scouting_data": [
                {"id": 50, "team_id": 1, "match_id": 77, "payload": {"x": 1}},
                {"id": 51, "team_id": 9, "match_id": null, "payload": {"x": 2}},
            ],
            "pit_scouting": [
                {"id": 60, "team_id": 1, "payload": {"drivetrain": "tank"}},
            ],
        });

        let report = import_service
            .import(Some(2222), &serde_json::to_vec(&bundle).unwrap())
            .await
            .unwrap();

        assert_eq!(report.skipped_count("scouting_data"), 2);
        assert_eq!(report.created_count("scouting_data"), 0);
        assert_eq!(report.created_count("pit_scouting"), 1);
    }

    /// Updating an existing record merges payloads conservatively
    #[tokio::test]
    async fn record_update_merges_conservatively() {
        let test = test_setup().await;
        let import_service = ImportService::new(&test.state.db);
        let record_repo = RecordRepository::new(&test.state.db);

        let bundle_one = json!({
            "teams": [{"id": 1, "team_number": 254}],
            "pit_scouting": [
                {"id": 60, "team_id": 1, "payload": {"a": 1, "b": 2}},
            ],
        });
        let bundle_two = json!({
            "teams": [{"id": 1, "team_number": 254}],
            "pit_scouting": [
                {"id": 60, "team_id": 1, "payload": {"a": null, "b": 3, "c": 4}},
            ],
        });

        import_service
            .import(Some(2222), &serde_json::to_vec(&bundle_one).unwrap())
            .await
            .unwrap();
        import_service
            .import(Some(2222), &serde_json::to_vec(&bundle_two).unwrap())
            .await
            .unwrap();

        let records = record_repo.get_all_by_owner(Some(2222)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload, json!({"a": 1, "b": 3, "c": 4}));
    }

    /// Duplicate team numbers in one archive cannot double-link an event
    #[tokio::test]
    async fn duplicate_link_is_reported_once() {
        let test = test_setup().await;
        let import_service = ImportService::new(&test.state.db);
        let link_repo = TeamEventRepository::new(&test.state.db);
        let event_repo = EventRepository::new(&test.state.db);

        let bundle = json!({
            "events": [{"id": 1, "code": "EVTX", "year": 2026}],
            "teams": [{"id": 1, "team_number": 254}],
            "team_event": [
                {"team_id": 1, "event_id": 1},
                {"team_id": 1, "event_id": 1},
            ],
        });

        let report = import_service
            .import(Some(2222), &serde_json::to_vec(&bundle).unwrap())
            .await
            .unwrap();

        assert_eq!(report.created_count("team_event"), 1);
        assert_eq!(report.skipped_count("team_event"), 1);

        let event = event_repo
            .get_by_code(Some(2222), "EVTX")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(link_repo.teams_on_event(event.id).await.unwrap().len(), 1);
    }
}
