use sea_orm_migration::{prelude::*, schema::*};

static IDX_ALLIANCE_MEMBER_ROSTER: &str = "idx-alliance_member-alliance_id-team_number";
static IDX_ALLIANCE_SHARED_EVENT_CODE: &str = "idx-alliance_shared_event-alliance_id-event_code";
static FK_ALLIANCE_MEMBER_ALLIANCE_ID: &str = "fk-alliance_member-alliance_id";
static FK_ALLIANCE_SHARED_EVENT_ALLIANCE_ID: &str = "fk-alliance_shared_event-alliance_id";
static FK_ALLIANCE_ACTIVATION_ALLIANCE_ID: &str = "fk-alliance_activation-alliance_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alliance::Table)
                    .if_not_exists()
                    .col(pk_auto(Alliance::Id))
                    .col(string_uniq(Alliance::Name))
                    .col(timestamp(Alliance::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AllianceMember::Table)
                    .if_not_exists()
                    .col(pk_auto(AllianceMember::Id))
                    .col(integer(AllianceMember::AllianceId))
                    .col(integer(AllianceMember::TeamNumber))
                    .col(string(AllianceMember::Role))
                    .col(string(AllianceMember::Status))
                    .col(boolean(AllianceMember::ShareData))
                    .col(timestamp(AllianceMember::CreatedAt))
                    .col(timestamp(AllianceMember::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ALLIANCE_MEMBER_ALLIANCE_ID)
                            .from_tbl(AllianceMember::Table)
                            .from_col(AllianceMember::AllianceId)
                            .to_tbl(Alliance::Table)
                            .to_col(Alliance::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AllianceSharedEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(AllianceSharedEvent::Id))
                    .col(integer(AllianceSharedEvent::AllianceId))
                    .col(string(AllianceSharedEvent::EventCode))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ALLIANCE_SHARED_EVENT_ALLIANCE_ID)
                            .from_tbl(AllianceSharedEvent::Table)
                            .from_col(AllianceSharedEvent::AllianceId)
                            .to_tbl(Alliance::Table)
                            .to_col(Alliance::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AllianceActivation::Table)
                    .if_not_exists()
                    .col(pk_auto(AllianceActivation::Id))
                    .col(integer_uniq(AllianceActivation::TeamNumber))
                    .col(integer_null(AllianceActivation::AllianceId))
                    .col(timestamp(AllianceActivation::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ALLIANCE_ACTIVATION_ALLIANCE_ID)
                            .from_tbl(AllianceActivation::Table)
                            .from_col(AllianceActivation::AllianceId)
                            .to_tbl(Alliance::Table)
                            .to_col(Alliance::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ALLIANCE_MEMBER_ROSTER)
                    .table(AllianceMember::Table)
                    .col(AllianceMember::AllianceId)
                    .col(AllianceMember::TeamNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ALLIANCE_SHARED_EVENT_CODE)
                    .table(AllianceSharedEvent::Table)
                    .col(AllianceSharedEvent::AllianceId)
                    .col(AllianceSharedEvent::EventCode)
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
                    .name(FK_ALLIANCE_ACTIVATION_ALLIANCE_ID)
                    .table(AllianceActivation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_ALLIANCE_SHARED_EVENT_ALLIANCE_ID)
                    .table(AllianceSharedEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_ALLIANCE_MEMBER_ALLIANCE_ID)
                    .table(AllianceMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ALLIANCE_SHARED_EVENT_CODE)
                    .table(AllianceSharedEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ALLIANCE_MEMBER_ROSTER)
                    .table(AllianceMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AllianceActivation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AllianceSharedEvent::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AllianceMember::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Alliance::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Alliance {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AllianceMember {
    Table,
    Id,
    AllianceId,
    TeamNumber,
    Role,
    Status,
    ShareData,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum AllianceSharedEvent {
    Table,
    Id,
    AllianceId,
    EventCode,
}

#[derive(DeriveIden)]
pub enum AllianceActivation {
    Table,
    Id,
    TeamNumber,
    AllianceId,
    UpdatedAt,
}
