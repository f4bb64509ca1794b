use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260801_000001_scout_event::ScoutEvent, m20260801_000002_scout_team::ScoutTeam,
};

static IDX_SCOUT_TEAM_EVENT_PAIR: &str = "idx-scout_team_event-team_id-event_id";
static FK_SCOUT_TEAM_EVENT_TEAM_ID: &str = "fk-scout_team_event-team_id";
static FK_SCOUT_TEAM_EVENT_EVENT_ID: &str = "fk-scout_team_event-event_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScoutTeamEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(ScoutTeamEvent::Id))
                    .col(integer(ScoutTeamEvent::TeamId))
                    .col(integer(ScoutTeamEvent::EventId))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SCOUT_TEAM_EVENT_TEAM_ID)
                            .from_tbl(ScoutTeamEvent::Table)
                            .from_col(ScoutTeamEvent::TeamId)
                            .to_tbl(ScoutTeam::Table)
                            .to_col(ScoutTeam::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SCOUT_TEAM_EVENT_EVENT_ID)
                            .from_tbl(ScoutTeamEvent::Table)
                            .from_col(ScoutTeamEvent::EventId)
                            .to_tbl(ScoutEvent::Table)
                            .to_col(ScoutEvent::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SCOUT_TEAM_EVENT_PAIR)
                    .table(ScoutTeamEvent::Table)
                    .col(ScoutTeamEvent::TeamId)
                    .col(ScoutTeamEvent::EventId)
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
                    .name(FK_SCOUT_TEAM_EVENT_EVENT_ID)
                    .table(ScoutTeamEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SCOUT_TEAM_EVENT_TEAM_ID)
                    .table(ScoutTeamEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SCOUT_TEAM_EVENT_PAIR)
                    .table(ScoutTeamEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScoutTeamEvent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScoutTeamEvent {
    Table,
    Id,
    TeamId,
    EventId,
}
