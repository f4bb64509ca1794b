//! Per-tenant push channels.
//!
//! Each tenant gets a broadcast channel carrying replication payloads and
//! job-status notifications. Delivery is advisory: a failed or unheard
//! publish is reported to the caller for logging, but the sync outbox
//! stays the single source of truth for delivery state, so consumers must
//! always be able to fall back to polling.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::broadcast;

use crate::{error::sync::PushError, model::push::PushMessage};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct PushGateway {
    channels: Arc<Mutex<HashMap<i32, broadcast::Sender<PushMessage>>>>,
}

impl Default for PushGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PushGateway {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to a tenant's channel, creating it on first use.
    pub fn subscribe(&self, team_number: i32) -> broadcast::Receiver<PushMessage> {
        let mut channels = self.channels.lock().expect("push channel map poisoned");

        channels
            .entry(team_number)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Best-effort publish to one tenant. Returns how many live receivers
    /// saw the message; the caller logs failures and moves on.
    pub fn publish(&self, team_number: i32, message: PushMessage) -> Result<usize, PushError> {
        let channels = self.channels.lock().expect("push channel map poisoned");

        let Some(sender) = channels.get(&team_number) else {
            return Err(PushError::NoSubscribers(team_number));
        };

        sender
            .send(message)
            .map_err(|_| PushError::ChannelClosed(team_number))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::PushGateway;
    use crate::model::push::PushMessage;

    fn message() -> PushMessage {
        PushMessage::SharedRecord {
            alliance_id: 1,
            from_number: 1111,
            data_kind: "scouting".to_string(),
            source_record_id: 42,
            payload: json!({}),
        }
    }

    /// Publishing to a tenant nobody subscribed to reports the failure
    /// instead of panicking or blocking
    #[tokio::test]
    async fn publish_without_subscriber_is_an_error() {
        let gateway = PushGateway::new();

        assert!(gateway.publish(2222, message()).is_err());
    }

    /// A subscriber receives what was published after it subscribed
    #[tokio::test]
    async fn subscriber_receives_published_message() {
        let gateway = PushGateway::new();

        let mut rx = gateway.subscribe(2222);
        let delivered = gateway.publish(2222, message()).unwrap();
        assert_eq!(delivered, 1);

        let received = rx.recv().await.unwrap();
        match received {
            PushMessage::SharedRecord { from_number, .. } => assert_eq!(from_number, 1111),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
