use crate::core::models::GroupEvent;
use crate::infrastructure::realtime::EventPublisher;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// One broadcast channel per group, created on first subscribe and
/// released by the first publish that finds no receivers left.
#[derive(Clone)]
pub struct BroadcastHub {
    capacity: usize,
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<GroupEvent>>>>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        BroadcastHub {
            capacity: capacity.max(1),
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self, group_id: &str) -> broadcast::Receiver<GroupEvent> {
        if let Some(sender) = self.read_channels().get(group_id) {
            return sender.subscribe();
        }
        let mut channels = match self.channels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        channels
            .entry(group_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    pub fn subscriber_count(&self, group_id: &str) -> usize {
        self.read_channels()
            .get(group_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Number of groups currently holding a channel.
    pub fn channel_count(&self) -> usize {
        self.read_channels().len()
    }

    fn read_channels(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, broadcast::Sender<GroupEvent>>> {
        match self.channels.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl BroadcastHub {
    // a subscriber may have joined between the send and the write lock
    fn release_if_idle(&self, group_id: &str) {
        let mut channels = match self.channels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if channels.get(group_id).is_some_and(|sender| sender.receiver_count() == 0) {
            channels.remove(group_id);
            debug!(group_id, "channel released");
        }
    }
}

impl EventPublisher for BroadcastHub {
    fn publish(&self, group_id: &str, event: GroupEvent) {
        let name = event.name();
        let delivered = {
            let channels = self.read_channels();
            let Some(sender) = channels.get(group_id) else {
                debug!(group_id, event = name, "no subscribers, event dropped");
                return;
            };
            sender.send(event)
        };
        match delivered {
            Ok(receivers) => debug!(group_id, event = name, receivers, "event published"),
            Err(_) => {
                debug!(group_id, event = name, "all subscribers gone, event dropped");
                self.release_if_idle(group_id);
            }
        }
    }
}

/// Logs how far a subscriber fell behind; the stream continues from the
/// oldest retained event.
pub fn report_lag(group_id: &str, skipped: u64) {
    warn!(group_id, skipped, "subscriber lagged, events skipped");
}
