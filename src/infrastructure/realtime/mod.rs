pub mod broadcast;

use crate::core::models::GroupEvent;

/// Delivers group events to connected clients.
///
/// Publishing is fire-and-forget: implementations swallow and log delivery
/// problems, so callers never fail because nobody is listening.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, group_id: &str, event: GroupEvent);
}
