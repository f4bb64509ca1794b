use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260801_000001_scout_event::ScoutEvent;

static IDX_SCOUT_MATCH_NATURAL_KEY: &str = "idx-scout_match-event_id-match_type-match_number";
static FK_SCOUT_MATCH_EVENT_ID: &str = "fk-scout_match-event_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScoutMatch::Table)
                    .if_not_exists()
                    .col(pk_auto(ScoutMatch::Id))
                    .col(integer_null(ScoutMatch::OwnerNumber))
                    .col(integer(ScoutMatch::EventId))
                    .col(string(ScoutMatch::MatchType))
                    .col(integer(ScoutMatch::MatchNumber))
                    .col(string_null(ScoutMatch::RedAlliance))
                    .col(string_null(ScoutMatch::BlueAlliance))
                    .col(integer_null(ScoutMatch::RedScore))
                    .col(integer_null(ScoutMatch::BlueScore))
                    .col(timestamp(ScoutMatch::CreatedAt))
                    .col(timestamp(ScoutMatch::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SCOUT_MATCH_EVENT_ID)
                            .from_tbl(ScoutMatch::Table)
                            .from_col(ScoutMatch::EventId)
                            .to_tbl(ScoutEvent::Table)
                            .to_col(ScoutEvent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SCOUT_MATCH_NATURAL_KEY)
                    .table(ScoutMatch::Table)
                    .col(ScoutMatch::EventId)
                    .col(ScoutMatch::MatchType)
                    .col(ScoutMatch::MatchNumber)
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
                    .name(FK_SCOUT_MATCH_EVENT_ID)
                    .table(ScoutMatch::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SCOUT_MATCH_NATURAL_KEY)
                    .table(ScoutMatch::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScoutMatch::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScoutMatch {
    Table,
    Id,
    OwnerNumber,
    EventId,
    MatchType,
    MatchNumber,
    RedAlliance,
    BlueAlliance,
    RedScore,
    BlueScore,
    CreatedAt,
    UpdatedAt,
}
