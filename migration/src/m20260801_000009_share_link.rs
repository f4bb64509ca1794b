use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShareLink::Table)
                    .if_not_exists()
                    .col(pk_auto(ShareLink::Id))
                    .col(string_uniq(ShareLink::ShareId))
                    .col(string(ShareLink::Kind))
                    .col(integer_null(ShareLink::OwnerNumber))
                    .col(json(ShareLink::Payload))
                    .col(timestamp(ShareLink::CreatedAt))
                    .col(timestamp(ShareLink::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShareLink::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ShareLink {
    Table,
    Id,
    ShareId,
    Kind,
    OwnerNumber,
    Payload,
    CreatedAt,
    UpdatedAt,
}
