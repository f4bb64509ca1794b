//! Portable dataset migration: zip export and background import.

pub mod archive;
pub mod export;
pub mod import;

/// Entity-type names used as archive file stems and report keys.
pub mod entry {
    pub const EVENTS: &str = "events";
    pub const TEAMS: &str = "teams";
    pub const TEAM_EVENT: &str = "team_event";
    pub const MATCHES: &str = "matches";
    pub const ALLIANCES: &str = "alliances";
    pub const SCOUTING_DATA: &str = "scouting_data";
    pub const PIT_SCOUTING: &str = "pit_scouting";
    pub const STRATEGY_DRAWINGS: &str = "strategy_drawings";
    pub const DO_NOT_PICK: &str = "do_not_pick";
    pub const AVOID: &str = "avoid";
    pub const SHARED_GRAPHS: &str = "shared_graphs";
    pub const SHARED_TEAM_RANKS: &str = "shared_team_ranks";

    pub const ALL: [&str; 12] = [
        EVENTS,
        TEAMS,
        TEAM_EVENT,
        MATCHES,
        ALLIANCES,
        SCOUTING_DATA,
        PIT_SCOUTING,
        STRATEGY_DRAWINGS,
        DO_NOT_PICK,
        AVOID,
        SHARED_GRAPHS,
        SHARED_TEAM_RANKS,
    ];
}
