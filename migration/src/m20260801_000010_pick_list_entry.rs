use sea_orm_migration::{prelude::*, schema::*};

static IDX_PICK_LIST_ENTRY_NATURAL_KEY: &str =
    "idx-pick_list_entry-owner_number-kind-team_number";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PickListEntry::Table)
                    .if_not_exists()
                    .col(pk_auto(PickListEntry::Id))
                    .col(integer_null(PickListEntry::OwnerNumber))
                    .col(string(PickListEntry::Kind))
                    .col(integer(PickListEntry::TeamNumber))
                    .col(string_null(PickListEntry::Reason))
                    .col(timestamp(PickListEntry::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PICK_LIST_ENTRY_NATURAL_KEY)
                    .table(PickListEntry::Table)
                    .col(PickListEntry::OwnerNumber)
                    .col(PickListEntry::Kind)
                    .col(PickListEntry::TeamNumber)
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
                    .name(IDX_PICK_LIST_ENTRY_NATURAL_KEY)
                    .table(PickListEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PickListEntry::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PickListEntry {
    Table,
    Id,
    OwnerNumber,
    Kind,
    TeamNumber,
    Reason,
    CreatedAt,
}
