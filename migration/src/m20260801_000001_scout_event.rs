use sea_orm_migration::{prelude::*, schema::*};

static IDX_SCOUT_EVENT_NATURAL_KEY: &str = "idx-scout_event-owner_number-code-year";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScoutEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(ScoutEvent::Id))
                    .col(integer_null(ScoutEvent::OwnerNumber))
                    .col(string(ScoutEvent::Code))
                    .col(string_null(ScoutEvent::Name))
                    .col(integer(ScoutEvent::Year))
                    .col(string_null(ScoutEvent::Location))
                    .col(date_null(ScoutEvent::StartDate))
                    .col(date_null(ScoutEvent::EndDate))
                    .col(string_null(ScoutEvent::Timezone))
                    .col(timestamp(ScoutEvent::CreatedAt))
                    .col(timestamp(ScoutEvent::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SCOUT_EVENT_NATURAL_KEY)
                    .table(ScoutEvent::Table)
                    .col(ScoutEvent::OwnerNumber)
                    .col(ScoutEvent::Code)
                    .col(ScoutEvent::Year)
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
                    .name(IDX_SCOUT_EVENT_NATURAL_KEY)
                    .table(ScoutEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScoutEvent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScoutEvent {
    Table,
    Id,
    OwnerNumber,
    Code,
    Name,
    Year,
    Location,
    StartDate,
    EndDate,
    Timezone,
    CreatedAt,
    UpdatedAt,
}
