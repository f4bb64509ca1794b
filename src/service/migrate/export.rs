//! Tenant dataset export.
//!
//! Rows are serialized with their local integer ids intact; the importer
//! never trusts those ids directly, it rebuilds identity maps from
//! natural keys.

use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::{
    data::{
        event::EventRepository, game_match::MatchRepository, pick_list::PickListRepository,
        record::RecordRepository, share_link::ShareLinkRepository, team::TeamRepository,
        team_event::TeamEventRepository,
    },
    error::Error,
    model::domain::{PickListKind, RecordKind, ShareLinkKind},
    service::migrate::{
        archive::{
            write_archive, ExportedEvent, ExportedLineup, ExportedMatch, ExportedPickListEntry,
            ExportedRecord, ExportedShareLink, ExportedTeam, ExportedTeamEvent,
        },
        entry,
    },
};

pub struct ExportService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ExportService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assemble the tenant's complete dataset as a zip archive.
    pub async fn export(&self, owner_number: Option<i32>) -> Result<Vec<u8>, Error> {
        let event_repo = EventRepository::new(self.db);
        let team_repo = TeamRepository::new(self.db);
        let link_repo = TeamEventRepository::new(self.db);
        let match_repo = MatchRepository::new(self.db);
        let record_repo = RecordRepository::new(self.db);
        let pick_list_repo = PickListRepository::new(self.db);
        let share_link_repo = ShareLinkRepository::new(self.db);

        let mut entries: BTreeMap<String, Vec<Value>> = BTreeMap::new();

        let events = event_repo.get_all_by_owner(owner_number).await?;
        entries.insert(
            entry::EVENTS.to_string(),
            to_rows(events.iter().map(|event| ExportedEvent {
                id: event.id,
                code: event.code.clone(),
                name: event.name.clone(),
                year: Some(event.year),
                location: event.location.clone(),
                start_date: event.start_date,
                end_date: event.end_date,
                timezone: event.timezone.clone(),
            }))?,
        );

        entries.insert(
            entry::TEAMS.to_string(),
            to_rows(
                team_repo
                    .get_all_by_owner(owner_number)
                    .await?
                    .iter()
                    .map(|team| ExportedTeam {
                        id: team.id,
                        team_number: team.team_number,
                        name: team.name.clone(),
                        location: team.location.clone(),
                    }),
            )?,
        );

        let mut links = Vec::new();
        let mut matches = Vec::new();
        let mut lineups = Vec::new();
        for event in &events {
            for link in link_repo.get_links_for_event(event.id).await? {
                links.push(ExportedTeamEvent {
                    team_id: link.team_id,
                    event_id: link.event_id,
                });
            }
            for game_match in match_repo.get_by_event(event.id).await? {
                lineups.push(ExportedLineup {
                    match_id: game_match.id,
                    red_alliance: game_match.red_alliance.clone(),
                    blue_alliance: game_match.blue_alliance.clone(),
                });
                matches.push(ExportedMatch {
                    id: game_match.id,
                    event_id: game_match.event_id,
                    event_code: Some(event.code.clone()),
                    match_type: game_match.match_type,
                    match_number: game_match.match_number,
                    red_alliance: game_match.red_alliance,
                    blue_alliance: game_match.blue_alliance,
                    red_score: game_match.red_score,
                    blue_score: game_match.blue_score,
                });
            }
        }
        entries.insert(entry::TEAM_EVENT.to_string(), to_rows(links.into_iter())?);
        entries.insert(entry::MATCHES.to_string(), to_rows(matches.into_iter())?);
        entries.insert(entry::ALLIANCES.to_string(), to_rows(lineups.into_iter())?);

        for (kind, name) in [
            (RecordKind::Scouting, entry::SCOUTING_DATA),
            (RecordKind::Pit, entry::PIT_SCOUTING),
            (RecordKind::Qualitative, entry::STRATEGY_DRAWINGS),
        ] {
            entries.insert(
                name.to_string(),
                to_rows(
                    record_repo
                        .get_by_owner_and_kind(owner_number, kind)
                        .await?
                        .into_iter()
                        .map(|record| ExportedRecord {
                            id: record.id,
                            team_id: record.team_id,
                            match_id: record.match_id,
                            scout_name: Some(record.scout_name),
                            payload: record.payload,
                        }),
                )?,
            );
        }

        for (kind, name) in [
            (PickListKind::DoNotPick, entry::DO_NOT_PICK),
            (PickListKind::Avoid, entry::AVOID),
        ] {
            entries.insert(
                name.to_string(),
                to_rows(
                    pick_list_repo
                        .get_all_by_owner(owner_number, kind)
                        .await?
                        .into_iter()
                        .map(|row| ExportedPickListEntry {
                            team_number: row.team_number,
                            reason: row.reason,
                        }),
                )?,
            );
        }

        let share_links = share_link_repo.get_all_by_owner(owner_number).await?;
        for (kind, name) in [
            (ShareLinkKind::Graph, entry::SHARED_GRAPHS),
            (ShareLinkKind::TeamRanks, entry::SHARED_TEAM_RANKS),
        ] {
            entries.insert(
                name.to_string(),
                to_rows(
                    share_links
                        .iter()
                        .filter(|link| link.kind == kind.as_str())
                        .map(|link| ExportedShareLink {
                            share_id: link.share_id.clone(),
                            payload: link.payload.clone(),
                        }),
                )?,
            );
        }

        Ok(write_archive(&entries)?)
    }
}

fn to_rows<T: serde::Serialize>(items: impl Iterator<Item = T>) -> Result<Vec<Value>, Error> {
    items
        .map(|item| serde_json::to_value(item).map_err(Error::from))
        .collect()
}
