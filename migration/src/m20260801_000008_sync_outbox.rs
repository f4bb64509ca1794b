use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260801_000006_alliance::Alliance;

static IDX_SYNC_OUTBOX_TO_STATUS: &str = "idx-sync_outbox-to_number-status";
static FK_SYNC_OUTBOX_ALLIANCE_ID: &str = "fk-sync_outbox-alliance_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncOutbox::Table)
                    .if_not_exists()
                    .col(pk_auto(SyncOutbox::Id))
                    .col(integer(SyncOutbox::AllianceId))
                    .col(integer(SyncOutbox::FromNumber))
                    .col(integer(SyncOutbox::ToNumber))
                    .col(string(SyncOutbox::DataKind))
                    .col(integer(SyncOutbox::SourceRecordId))
                    .col(json(SyncOutbox::Payload))
                    .col(string(SyncOutbox::Status))
                    .col(timestamp(SyncOutbox::CreatedAt))
                    .col(timestamp_null(SyncOutbox::SyncedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SYNC_OUTBOX_ALLIANCE_ID)
                            .from_tbl(SyncOutbox::Table)
                            .from_col(SyncOutbox::AllianceId)
                            .to_tbl(Alliance::Table)
                            .to_col(Alliance::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Poll queries filter on (to_number, status); not unique, a record
        // re-replicated to the same peer creates a fresh delivery row.
        manager
            .create_index(
                Index::create()
                    .name(IDX_SYNC_OUTBOX_TO_STATUS)
                    .table(SyncOutbox::Table)
                    .col(SyncOutbox::ToNumber)
                    .col(SyncOutbox::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SYNC_OUTBOX_ALLIANCE_ID)
                    .table(SyncOutbox::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SYNC_OUTBOX_TO_STATUS)
                    .table(SyncOutbox::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SyncOutbox::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SyncOutbox {
    Table,
    Id,
    AllianceId,
    FromNumber,
    ToNumber,
    DataKind,
    SourceRecordId,
    Payload,
    Status,
    CreatedAt,
    SyncedAt,
}
