use sea_orm_migration::{prelude::*, schema::*};

static IDX_SCOUT_TEAM_NATURAL_KEY: &str = "idx-scout_team-owner_number-team_number";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScoutTeam::Table)
                    .if_not_exists()
                    .col(pk_auto(ScoutTeam::Id))
                    .col(integer_null(ScoutTeam::OwnerNumber))
                    .col(integer(ScoutTeam::TeamNumber))
                    .col(string_null(ScoutTeam::Name))
                    .col(string_null(ScoutTeam::Location))
                    .col(timestamp(ScoutTeam::CreatedAt))
                    .col(timestamp(ScoutTeam::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SCOUT_TEAM_NATURAL_KEY)
                    .table(ScoutTeam::Table)
                    .col(ScoutTeam::OwnerNumber)
                    .col(ScoutTeam::TeamNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SCOUT_TEAM_NATURAL_KEY)
                    .table(ScoutTeam::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScoutTeam::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScoutTeam {
    Table,
    Id,
    OwnerNumber,
    TeamNumber,
    Name,
    Location,
    CreatedAt,
    UpdatedAt,
}
