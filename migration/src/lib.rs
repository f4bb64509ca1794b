pub use sea_orm_migration::prelude::*;

mod m20260801_000001_scout_event;
mod m20260801_000002_scout_team;
mod m20260801_000003_scout_team_event;
mod m20260801_000004_scout_match;
mod m20260801_000005_scout_record;
mod m20260801_000006_alliance;
mod m20260801_000007_shared_record;
mod m20260801_000008_sync_outbox;
mod m20260801_000009_share_link;
mod m20260801_000010_pick_list_entry;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_scout_event::Migration),
            Box::new(m20260801_000002_scout_team::Migration),
            Box::new(m20260801_000003_scout_team_event::Migration),
            Box::new(m20260801_000004_scout_match::Migration),
            Box::new(m20260801_000005_scout_record::Migration),
            Box::new(m20260801_000006_alliance::Migration),
            Box::new(m20260801_000007_shared_record::Migration),
            Box::new(m20260801_000008_sync_outbox::Migration),
            Box::new(m20260801_000009_share_link::Migration),
            Box::new(m20260801_000010_pick_list_entry::Migration),
        ]
    }
}
