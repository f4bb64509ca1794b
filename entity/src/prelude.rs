pub use super::alliance::Entity as Alliance;
pub use super::alliance_activation::Entity as AllianceActivation;
pub use super::alliance_member::Entity as AllianceMember;
pub use super::alliance_shared_event::Entity as AllianceSharedEvent;
pub use super::pick_list_entry::Entity as PickListEntry;
pub use super::scout_event::Entity as ScoutEvent;
pub use super::scout_match::Entity as ScoutMatch;
pub use super::scout_record::Entity as ScoutRecord;
pub use super::scout_team::Entity as ScoutTeam;
pub use super::scout_team_event::Entity as ScoutTeamEvent;
pub use super::share_link::Entity as ShareLink;
pub use super::shared_record::Entity as SharedRecord;
pub use super::sync_outbox::Entity as SyncOutbox;
