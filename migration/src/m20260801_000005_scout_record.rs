use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260801_000002_scout_team::ScoutTeam, m20260801_000004_scout_match::ScoutMatch,
};

static IDX_SCOUT_RECORD_NATURAL_KEY: &str =
    "idx-scout_record-owner_number-kind-team_id-match_id";
static FK_SCOUT_RECORD_TEAM_ID: &str = "fk-scout_record-team_id";
static FK_SCOUT_RECORD_MATCH_ID: &str = "fk-scout_record-match_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScoutRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(ScoutRecord::Id))
                    .col(integer_null(ScoutRecord::OwnerNumber))
                    .col(string(ScoutRecord::Kind))
                    .col(integer(ScoutRecord::TeamId))
                    .col(integer_null(ScoutRecord::MatchId))
                    .col(string(ScoutRecord::ScoutName))
                    .col(json(ScoutRecord::Payload))
                    .col(timestamp(ScoutRecord::CreatedAt))
                    .col(timestamp(ScoutRecord::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SCOUT_RECORD_TEAM_ID)
                            .from_tbl(ScoutRecord::Table)
                            .from_col(ScoutRecord::TeamId)
                            .to_tbl(ScoutTeam::Table)
                            .to_col(ScoutTeam::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SCOUT_RECORD_MATCH_ID)
                            .from_tbl(ScoutRecord::Table)
                            .from_col(ScoutRecord::MatchId)
                            .to_tbl(ScoutMatch::Table)
                            .to_col(ScoutMatch::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SCOUT_RECORD_NATURAL_KEY)
                    .table(ScoutRecord::Table)
                    .col(ScoutRecord::OwnerNumber)
                    .col(ScoutRecord::Kind)
                    .col(ScoutRecord::TeamId)
                    .col(ScoutRecord::MatchId)
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
                    .name(FK_SCOUT_RECORD_MATCH_ID)
                    .table(ScoutRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SCOUT_RECORD_TEAM_ID)
                    .table(ScoutRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SCOUT_RECORD_NATURAL_KEY)
                    .table(ScoutRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScoutRecord::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScoutRecord {
    Table,
    Id,
    OwnerNumber,
    Kind,
    TeamId,
    MatchId,
    ScoutName,
    Payload,
    CreatedAt,
    UpdatedAt,
}
