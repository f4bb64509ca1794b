//! Domain vocabulary shared by the data and service layers.
//!
//! The database stores these as plain strings; the enums here are the
//! single place that knows the valid values.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of observational record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Per-match scouting entry; requires a match reference.
    Scouting,
    /// Pit scouting entry; team-keyed, no match.
    Pit,
    /// Qualitative entry (strategy drawing or free-form note).
    Qualitative,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scouting => "scouting",
            Self::Pit => "pit",
            Self::Qualitative => "qualitative",
        }
    }
}

/// Role of an alliance member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

/// Invitation status of an alliance member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Accepted,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

/// Delivery status of an outbox entry. Transitions only pending -> synced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    Pending,
    Synced,
}

impl OutboxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
        }
    }
}

/// Kind of globally-shareable artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShareLinkKind {
    Graph,
    TeamRanks,
}

impl ShareLinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::TeamRanks => "team_ranks",
        }
    }
}

/// Kind of pick-list entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PickListKind {
    DoNotPick,
    Avoid,
}

impl PickListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoNotPick => "do_not_pick",
            Self::Avoid => "avoid",
        }
    }
}

/// Which side wins when the merged read path sees both an alliance-shared
/// copy and a tenant-local copy of the same record. A tagged choice rather
/// than a boolean so call sites document the policy they apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DedupPreference {
    PreferAlliance,
    PreferLocal,
}
