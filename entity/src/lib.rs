//! Database entity models for the ScoutSync server.
//!
//! One module per table. Composite unique indexes are defined in the
//! `migration` crate; single-column uniqueness is annotated here so the
//! models document their own natural keys.

pub mod alliance;
pub mod alliance_activation;
pub mod alliance_member;
pub mod alliance_shared_event;
pub mod pick_list_entry;
pub mod scout_event;
pub mod scout_match;
pub mod scout_record;
pub mod scout_team;
pub mod scout_team_event;
pub mod share_link;
pub mod shared_record;
pub mod sync_outbox;

pub mod prelude;
