use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260801_000006_alliance::Alliance;

static IDX_SHARED_RECORD_IDENTITY: &str =
    "idx-shared_record-alliance_id-source_number-source_record_id";
static FK_SHARED_RECORD_ALLIANCE_ID: &str = "fk-shared_record-alliance_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharedRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(SharedRecord::Id))
                    .col(integer(SharedRecord::AllianceId))
                    .col(integer(SharedRecord::SourceNumber))
                    .col(integer(SharedRecord::SourceRecordId))
                    .col(string(SharedRecord::Kind))
                    .col(integer(SharedRecord::TeamNumber))
                    .col(string(SharedRecord::EventCode))
                    .col(string_null(SharedRecord::MatchType))
                    .col(integer_null(SharedRecord::MatchNumber))
                    .col(string(SharedRecord::ScoutName))
                    .col(json(SharedRecord::Payload))
                    .col(boolean(SharedRecord::IsActive))
                    .col(integer(SharedRecord::LastEditedBy))
                    .col(timestamp(SharedRecord::CreatedAt))
                    .col(timestamp(SharedRecord::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SHARED_RECORD_ALLIANCE_ID)
                            .from_tbl(SharedRecord::Table)
                            .from_col(SharedRecord::AllianceId)
                            .to_tbl(Alliance::Table)
                            .to_col(Alliance::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SHARED_RECORD_IDENTITY)
                    .table(SharedRecord::Table)
                    .col(SharedRecord::AllianceId)
                    .col(SharedRecord::SourceNumber)
                    .col(SharedRecord::SourceRecordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SHARED_RECORD_ALLIANCE_ID)
                    .table(SharedRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SHARED_RECORD_IDENTITY)
                    .table(SharedRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SharedRecord::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SharedRecord {
    Table,
    Id,
    AllianceId,
    SourceNumber,
    SourceRecordId,
    Kind,
    TeamNumber,
    EventCode,
    MatchType,
    MatchNumber,
    ScoutName,
    Payload,
    IsActive,
    LastEditedBy,
    CreatedAt,
    UpdatedAt,
}
