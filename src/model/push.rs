//! Messages delivered over the per-tenant push channel.
//!
//! Consumers treat the channel as advisory only; replication payloads are
//! always recoverable through the sync outbox poll path.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// A replication payload from an alliance peer.
    SharedRecord {
        alliance_id: i32,
        from_number: i32,
        data_kind: String,
        source_record_id: i32,
        payload: serde_json::Value,
    },
    /// A background job changed status.
    JobStatus {
        job_id: String,
        status: String,
        message: Option<String>,
    },
}
