//! Record writes, alliance replication and the sync outbox.
//!
//! Every tenant-local record write may fan out into the active alliance.
//! The record and its shared projection row are written in one
//! transaction: a projection failure aborts the write itself. Outbox
//! deliveries and push notifications happen after commit and are strictly
//! best effort per attempt; a missed delivery is made up by the next
//! write to the same record, never by failing the caller.

use std::collections::HashMap;

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    data::{
        alliance_activation::AllianceActivationRepository,
        alliance_member::AllianceMemberRepository,
        event::EventSeed,
        game_match::{MatchRepository, MatchSeed},
        record::RecordRepository,
        shared_record::{SharedRecordRepository, SharedRecordSeed},
        sync_outbox::SyncOutboxRepository,
        team::TeamRepository,
        team_event::TeamEventRepository,
    },
    error::{sync::SyncError, Error},
    model::{
        api::{PendingDeliveryDto, RecordDto, SubmitRecordDto},
        domain::{DedupPreference, MemberRole, RecordKind},
        push::PushMessage,
    },
    push::PushGateway,
    service::{
        resolver::EventResolver,
        scope::ScopeResolver,
    },
};

/// Where a write must replicate, decided before the write transaction
/// opens so the projection can share it.
struct ReplicationPlan {
    alliance_id: i32,
    from_number: i32,
    recipients: Vec<i32>,
}

pub struct ReplicationService<'a> {
    db: &'a DatabaseConnection,
    push: &'a PushGateway,
}

impl<'a> ReplicationService<'a> {
    pub fn new(db: &'a DatabaseConnection, push: &'a PushGateway) -> Self {
        Self { db, push }
    }

    /// Foreground record write: resolve the event, team and (for per-match
    /// kinds) the match, then create or update the record by its natural
    /// key. A second write to the same key replaces payload and
    /// attribution. The record and its alliance projection commit together;
    /// outbox fan-out and push follow the commit and never fail the write.
    pub async fn submit_record(
        &self,
        team_number: i32,
        dto: SubmitRecordDto,
    ) -> Result<entity::scout_record::Model, Error> {
        let owner = Some(team_number);
        let event_resolver = EventResolver::new(self.db);
        let team_repo = TeamRepository::new(self.db);
        let link_repo = TeamEventRepository::new(self.db);
        let match_repo = MatchRepository::new(self.db);

        let event = event_resolver
            .resolve(
                owner,
                &EventSeed {
                    code: dto.event_code.clone(),
                    ..Default::default()
                },
            )
            .await?;

        let team = crate::data::find_or_create(
            || team_repo.get_by_number(owner, dto.team_number),
            || team_repo.create(owner, dto.team_number, None, None),
        )
        .await?;
        link_repo.link_checked(&team, event.id).await?;

        let match_id = match dto.kind {
            RecordKind::Scouting => {
                let match_type = dto
                    .match_type
                    .as_deref()
                    .ok_or(SyncError::MissingReference("match_type"))?;
                let match_number = dto
                    .match_number
                    .ok_or(SyncError::MissingReference("match_number"))?;

                let (game_match, _) = match_repo
                    .upsert_by_natural_key(
                        owner,
                        event.id,
                        match_type,
                        match_number,
                        &MatchSeed::default(),
                    )
                    .await?;
                Some(game_match.id)
            }
            RecordKind::Pit | RecordKind::Qualitative => None,
        };

        let plan = self.replication_plan(team_number, &event.code).await?;

        let txn = self.db.begin().await?;
        let record = Self::write_with_projection(
            &txn,
            team_number,
            &dto,
            team.id,
            match_id,
            &event.code,
            plan.as_ref(),
        )
        .await?;
        txn.commit().await?;

        if let Some(plan) = plan {
            self.fan_out(&plan, &record).await;
        }

        Ok(record)
    }

    /// Decide whether a write replicates: alliance mode active, the
    /// caller's share_data flag set, and the event code on the shared
    /// list. Returns the recipients the fan-out will address.
    async fn replication_plan(
        &self,
        team_number: i32,
        event_code: &str,
    ) -> Result<Option<ReplicationPlan>, Error> {
        let scope = ScopeResolver::new(self.db).resolve(team_number).await?;

        let Some((alliance_id, _)) = scope.alliance else {
            return Ok(None);
        };
        if !scope.shared_event_codes.contains(event_code) {
            return Ok(None);
        }

        let member_repo = AllianceMemberRepository::new(self.db);
        let sharing = member_repo
            .get(alliance_id, team_number)
            .await?
            .map(|member| member.share_data)
            .unwrap_or(false);
        if !sharing {
            return Ok(None);
        }

        let recipients = self.active_recipients(alliance_id, team_number).await?;

        Ok(Some(ReplicationPlan {
            alliance_id,
            from_number: team_number,
            recipients,
        }))
    }

    /// Record upsert plus, when a plan is given, the shared projection
    /// upsert, on one connection. The caller owns the transaction; a
    /// projection failure therefore takes the record write down with it.
    async fn write_with_projection<C: ConnectionTrait>(
        conn: &C,
        team_number: i32,
        dto: &SubmitRecordDto,
        team_id: i32,
        match_id: Option<i32>,
        event_code: &str,
        plan: Option<&ReplicationPlan>,
    ) -> Result<entity::scout_record::Model, Error> {
        let owner = Some(team_number);
        let record_repo = RecordRepository::new(conn);

        let record = match record_repo
            .get_by_natural_key(owner, dto.kind, team_id, match_id)
            .await?
        {
            Some(existing) => {
                record_repo
                    .update_replace(existing, &dto.scout_name, dto.payload.clone())
                    .await?
            }
            None => {
                record_repo
                    .create(
                        owner,
                        dto.kind,
                        team_id,
                        match_id,
                        &dto.scout_name,
                        dto.payload.clone(),
                    )
                    .await?
            }
        };

        if let Some(plan) = plan {
            SharedRecordRepository::new(conn)
                .upsert(SharedRecordSeed {
                    alliance_id: plan.alliance_id,
                    source_number: plan.from_number,
                    source_record_id: record.id,
                    kind: record.kind.clone(),
                    team_number: dto.team_number,
                    event_code: event_code.to_string(),
                    match_type: dto.match_type.clone(),
                    match_number: dto.match_number,
                    scout_name: record.scout_name.clone(),
                    payload: record.payload.clone(),
                })
                .await?;
        }

        Ok(record)
    }

    /// Post-commit fan-out: one outbox row and one push per recipient.
    /// Failures are logged per recipient and never surface to the caller;
    /// the next write to the record re-queues deliveries.
    async fn fan_out(&self, plan: &ReplicationPlan, record: &entity::scout_record::Model) {
        let outbox_repo = SyncOutboxRepository::new(self.db);

        for recipient in &plan.recipients {
            if let Err(err) = outbox_repo
                .create(
                    plan.alliance_id,
                    plan.from_number,
                    *recipient,
                    &record.kind,
                    record.id,
                    record.payload.clone(),
                )
                .await
            {
                tracing::warn!(
                    recipient = *recipient,
                    record_id = record.id,
                    "Outbox delivery not queued: {}",
                    err
                );
                continue;
            }

            let message = PushMessage::SharedRecord {
                alliance_id: plan.alliance_id,
                from_number: plan.from_number,
                data_kind: record.kind.clone(),
                source_record_id: record.id,
                payload: record.payload.clone(),
            };
            if let Err(err) = self.push.publish(*recipient, message) {
                tracing::debug!(recipient = *recipient, "Push not delivered: {}", err);
            }
        }
    }

    /// Accepted members, other than the author, whose activation currently
    /// points at the alliance.
    async fn active_recipients(
        &self,
        alliance_id: i32,
        author_number: i32,
    ) -> Result<Vec<i32>, Error> {
        let member_repo = AllianceMemberRepository::new(self.db);
        let activation_repo = AllianceActivationRepository::new(self.db);

        let mut recipients = Vec::new();
        for member in member_repo.get_accepted(alliance_id).await? {
            if member.team_number == author_number {
                continue;
            }
            let active = activation_repo
                .get_for_team(member.team_number)
                .await?
                .map(|activation| activation.alliance_id == Some(alliance_id))
                .unwrap_or(false);
            if active {
                recipients.push(member.team_number);
            }
        }

        Ok(recipients)
    }

    /// Deliveries still pending for the caller, oldest first.
    pub async fn poll(&self, team_number: i32) -> Result<Vec<PendingDeliveryDto>, Error> {
        let outbox_repo = SyncOutboxRepository::new(self.db);

        Ok(outbox_repo
            .get_pending_for(team_number)
            .await?
            .into_iter()
            .map(|entry| PendingDeliveryDto {
                id: entry.id,
                data_kind: entry.data_kind,
                from_number: entry.from_number,
                payload: entry.payload,
            })
            .collect())
    }

    /// Acknowledge one delivery. Idempotent; only the addressee may ack.
    pub async fn ack(
        &self,
        team_number: i32,
        entry_id: i32,
    ) -> Result<entity::sync_outbox::Model, Error> {
        let outbox_repo = SyncOutboxRepository::new(self.db);

        let entry = outbox_repo
            .get_by_id(entry_id)
            .await?
            .ok_or(SyncError::OutboxEntryNotFound(entry_id))?;

        if entry.to_number != team_number {
            return Err(SyncError::OutboxEntryForbidden {
                entry_id,
                team_number,
            }
            .into());
        }

        Ok(outbox_repo.ack(entry).await?)
    }

    /// Scope-resolved record listing. With alliance mode active the
    /// caller's own contributions exist twice, once locally and once in
    /// the shared projection; the preference picks which copy is served.
    pub async fn list_records(
        &self,
        team_number: i32,
        kind: Option<RecordKind>,
        preference: DedupPreference,
    ) -> Result<Vec<RecordDto>, Error> {
        let record_repo = RecordRepository::new(self.db);
        let shared_repo = SharedRecordRepository::new(self.db);

        let scope = ScopeResolver::new(self.db).resolve(team_number).await?;

        let local = match kind {
            Some(kind) => record_repo.get_by_owner_and_kind(Some(team_number), kind).await?,
            None => record_repo.get_all_by_owner(Some(team_number)).await?,
        };

        let shared: Vec<entity::shared_record::Model> = match scope.alliance {
            Some((alliance_id, _)) => shared_repo
                .get_active_for_alliance(alliance_id)
                .await?
                .into_iter()
                .filter(|row| {
                    kind.map(|kind| row.kind == kind.as_str()).unwrap_or(true)
                        && scope
                            .shared_event_codes
                            .contains(row.event_code.as_str())
                })
                .collect(),
            None => Vec::new(),
        };

        let own_shared_ids: HashMap<i32, i32> = shared
            .iter()
            .filter(|row| row.source_number == team_number)
            .map(|row| (row.source_record_id, row.id))
            .collect();

        let mut dtos = Vec::new();

        for row in &shared {
            if row.source_number == team_number && preference == DedupPreference::PreferLocal {
                continue;
            }
            dtos.push(RecordDto {
                id: row.source_record_id,
                kind: row.kind.clone(),
                team_number: row.team_number,
                event_code: Some(row.event_code.clone()),
                match_type: row.match_type.clone(),
                match_number: row.match_number,
                scout_name: row.scout_name.clone(),
                payload: row.payload.clone(),
                source_number: Some(row.source_number),
                shared_record_id: Some(row.id),
            });
        }

        for record in local {
            if preference == DedupPreference::PreferAlliance
                && own_shared_ids.contains_key(&record.id)
            {
                continue;
            }
            dtos.push(self.local_record_dto(record).await?);
        }

        Ok(dtos)
    }

    /// DTO projection of a tenant-local record row.
    pub async fn local_record_dto(
        &self,
        record: entity::scout_record::Model,
    ) -> Result<RecordDto, Error> {
        let team_repo = TeamRepository::new(self.db);
        let match_repo = MatchRepository::new(self.db);
        let event_repo = crate::data::event::EventRepository::new(self.db);

        let team_number = team_repo
            .get_by_id(record.team_id)
            .await?
            .map(|team| team.team_number)
            .ok_or(SyncError::MissingReference("team"))?;

        let (match_type, match_number, event_code) = match record.match_id {
            Some(match_id) => match match_repo.get_by_id(match_id).await? {
                Some(game_match) => {
                    let code = event_repo
                        .get_by_id(game_match.event_id)
                        .await?
                        .map(|event| event.code);
                    (
                        Some(game_match.match_type),
                        Some(game_match.match_number),
                        code,
                    )
                }
                None => (None, None, None),
            },
            None => (None, None, None),
        };

        Ok(RecordDto {
            id: record.id,
            kind: record.kind,
            team_number,
            event_code,
            match_type,
            match_number,
            scout_name: record.scout_name,
            payload: record.payload,
            source_number: record.owner_number,
            shared_record_id: None,
        })
    }

    /// Soft-delete a shared contribution. Allowed for the contribution's
    /// source tenant and for admins of the alliance; the row stays behind
    /// inactive and revives on the next replication of its source.
    pub async fn remove_shared_record(
        &self,
        team_number: i32,
        shared_record_id: i32,
    ) -> Result<entity::shared_record::Model, Error> {
        let shared_repo = SharedRecordRepository::new(self.db);
        let member_repo = AllianceMemberRepository::new(self.db);

        let record = shared_repo
            .get_by_id(shared_record_id)
            .await?
            .ok_or(SyncError::SharedRecordNotFound(shared_record_id))?;

        let scope = ScopeResolver::new(self.db).resolve(team_number).await?;
        if scope.alliance.map(|(id, _)| id) != Some(record.alliance_id) {
            return Err(SyncError::SharedRecordNotFound(shared_record_id).into());
        }

        if record.source_number != team_number {
            let is_admin = member_repo
                .get(record.alliance_id, team_number)
                .await?
                .map(|member| member.role == MemberRole::Admin.as_str())
                .unwrap_or(false);
            if !is_admin {
                return Err(SyncError::NotAnAdmin(team_number).into());
            }
        }

        Ok(shared_repo.deactivate(record, team_number).await?)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, TransactionTrait};
    use serde_json::json;

    use crate::{
        data::{
            alliance::AllianceRepository, record::RecordRepository,
            shared_record::SharedRecordRepository,
        },
        model::{
            api::SubmitRecordDto,
            domain::{DedupPreference, RecordKind},
        },
        service::replication::{ReplicationPlan, ReplicationService},
        util::test::setup::{
            test_setup, test_setup_create_alliance, test_setup_create_record,
            test_setup_create_team, TestSetup,
        },
    };

    fn scouting_dto(team_number: i32, payload: serde_json::Value) -> SubmitRecordDto {
        SubmitRecordDto {
            kind: RecordKind::Scouting,
            team_number,
            event_code: "EVTX".to_string(),
            match_type: Some("qualification".to_string()),
            match_number: Some(1),
            scout_name: "scout-a".to_string(),
            payload,
        }
    }

    async fn shared_alliance(test: &TestSetup, members: &[i32]) -> i32 {
        let alliance = test_setup_create_alliance(test, "TestAlliance", members)
            .await
            .unwrap();
        AllianceRepository::new(&test.state.db)
            .set_shared_event_codes(alliance.id, &["EVTX".to_string()])
            .await
            .unwrap();
        alliance.id
    }

    /// Two tenants, one shared event: a write by one shows up in the
    /// other's poll, disappears after ack, and re-acking stays a no-op
    #[tokio::test]
    async fn fresh_sync_poll_and_ack() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222]).await;

        replication_service
            .submit_record(1111, scouting_dto(254, json!({"auto_points": 12})))
            .await
            .unwrap();

        let pending = replication_service.poll(2222).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].from_number, 1111);
        assert_eq!(pending[0].data_kind, "scouting");

        let entry_id = pending[0].id;
        replication_service.ack(2222, entry_id).await.unwrap();
        assert!(replication_service.poll(2222).await.unwrap().is_empty());

        // Idempotent re-ack
        replication_service.ack(2222, entry_id).await.unwrap();

        // The author has nothing pending
        assert!(replication_service.poll(1111).await.unwrap().is_empty());

        Ok(())
    }

    /// One write fans out to every other active member, each with an
    /// independently ackable delivery
    #[tokio::test]
    async fn fan_out_reaches_all_other_members() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222, 3333, 4444]).await;

        replication_service
            .submit_record(1111, scouting_dto(254, json!({})))
            .await
            .unwrap();

        let second = replication_service.poll(2222).await.unwrap();
        let third = replication_service.poll(3333).await.unwrap();
        let fourth = replication_service.poll(4444).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(third.len(), 1);
        assert_eq!(fourth.len(), 1);

        replication_service.ack(3333, third[0].id).await.unwrap();
        assert_eq!(replication_service.poll(2222).await.unwrap().len(), 1);
        assert!(replication_service.poll(3333).await.unwrap().is_empty());

        Ok(())
    }

    /// Acking someone else's delivery is refused
    #[tokio::test]
    async fn ack_requires_addressee() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222]).await;

        replication_service
            .submit_record(1111, scouting_dto(254, json!({})))
            .await
            .unwrap();

        let pending = replication_service.poll(2222).await.unwrap();
        assert!(replication_service.ack(3333, pending[0].id).await.is_err());

        Ok(())
    }

    /// Records for events outside the shared list stay local
    #[tokio::test]
    async fn unshared_event_is_not_replicated() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222]).await;

        let mut dto = scouting_dto(254, json!({}));
        dto.event_code = "OTHER".to_string();
        replication_service.submit_record(1111, dto).await.unwrap();

        assert!(replication_service.poll(2222).await.unwrap().is_empty());

        Ok(())
    }

    /// The shared projection rides the record write's transaction: a
    /// rollback leaves neither row behind, a commit leaves both
    #[tokio::test]
    async fn projection_shares_the_write_transaction() -> Result<(), DbErr> {
        let test = test_setup().await;

        let alliance_id = shared_alliance(&test, &[1111, 2222]).await;
        let team = test_setup_create_team(&test, Some(1111), 254).await.unwrap();

        let plan = ReplicationPlan {
            alliance_id,
            from_number: 1111,
            recipients: vec![2222],
        };
        let dto = SubmitRecordDto {
            kind: RecordKind::Pit,
            team_number: 254,
            event_code: "EVTX".to_string(),
            match_type: None,
            match_number: None,
            scout_name: "scout-a".to_string(),
            payload: json!({"drivetrain": "swerve"}),
        };

        let txn = test.state.db.begin().await?;
        ReplicationService::write_with_projection(
            &txn,
            1111,
            &dto,
            team.id,
            None,
            "EVTX",
            Some(&plan),
        )
        .await
        .unwrap();
        txn.rollback().await?;

        let record_repo = RecordRepository::new(&test.state.db);
        let shared_repo = SharedRecordRepository::new(&test.state.db);
        assert!(record_repo.get_all_by_owner(Some(1111)).await?.is_empty());
        assert!(shared_repo
            .get_active_for_alliance(alliance_id)
            .await?
            .is_empty());

        let txn = test.state.db.begin().await?;
        ReplicationService::write_with_projection(
            &txn,
            1111,
            &dto,
            team.id,
            None,
            "EVTX",
            Some(&plan),
        )
        .await
        .unwrap();
        txn.commit().await?;

        assert_eq!(record_repo.get_all_by_owner(Some(1111)).await?.len(), 1);
        assert_eq!(
            shared_repo.get_active_for_alliance(alliance_id).await?.len(),
            1
        );

        Ok(())
    }

    /// A second write to the same natural key updates in place and the
    /// shared projection follows
    #[tokio::test]
    async fn rewrite_updates_shared_projection() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222]).await;

        let first = replication_service
            .submit_record(1111, scouting_dto(254, json!({"auto_points": 3})))
            .await
            .unwrap();
        let second = replication_service
            .submit_record(1111, scouting_dto(254, json!({"auto_points": 9})))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        let records = replication_service
            .list_records(2222, Some(RecordKind::Scouting), DedupPreference::PreferAlliance)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload, json!({"auto_points": 9}));
        assert_eq!(records[0].source_number, Some(1111));

        Ok(())
    }

    /// The author sees their own record exactly once under either
    /// preference
    #[tokio::test]
    async fn merged_read_deduplicates_own_records() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222]).await;

        replication_service
            .submit_record(1111, scouting_dto(254, json!({"auto_points": 5})))
            .await
            .unwrap();

        let prefer_local = replication_service
            .list_records(1111, None, DedupPreference::PreferLocal)
            .await
            .unwrap();
        assert_eq!(prefer_local.len(), 1);
        assert!(prefer_local[0].shared_record_id.is_none());

        let prefer_alliance = replication_service
            .list_records(1111, None, DedupPreference::PreferAlliance)
            .await
            .unwrap();
        assert_eq!(prefer_alliance.len(), 1);
        assert!(prefer_alliance[0].shared_record_id.is_some());

        Ok(())
    }

    /// Matchless local rows list with no event or match reference and no
    /// shared counterpart
    #[tokio::test]
    async fn matchless_record_lists_without_event() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        let team = test_setup_create_team(&test, Some(1111), 254).await.unwrap();
        test_setup_create_record(&test, Some(1111), RecordKind::Pit, team.id)
            .await
            .unwrap();

        let records = replication_service
            .list_records(1111, Some(RecordKind::Pit), DedupPreference::PreferLocal)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team_number, 254);
        assert!(records[0].event_code.is_none());
        assert!(records[0].match_type.is_none());
        assert!(records[0].shared_record_id.is_none());

        Ok(())
    }

    /// Soft-deleted contributions disappear from the merged read but the
    /// author's local copy survives
    #[tokio::test]
    async fn soft_delete_hides_shared_copy_only() -> Result<(), DbErr> {
        let test = test_setup().await;
        let replication_service = ReplicationService::new(&test.state.db, &test.state.push);

        shared_alliance(&test, &[1111, 2222]).await;

        replication_service
            .submit_record(2222, scouting_dto(254, json!({})))
            .await
            .unwrap();

        let seen = replication_service
            .list_records(1111, None, DedupPreference::PreferAlliance)
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
        let shared_id = seen[0].shared_record_id.unwrap();

        // 1111 is the alliance admin
        replication_service
            .remove_shared_record(1111, shared_id)
            .await
            .unwrap();

        assert!(replication_service
            .list_records(1111, None, DedupPreference::PreferAlliance)
            .await
            .unwrap()
            .is_empty());

        let local = replication_service
            .list_records(2222, None, DedupPreference::PreferLocal)
            .await
            .unwrap();
        assert_eq!(local.len(), 1);

        Ok(())
    }
}
