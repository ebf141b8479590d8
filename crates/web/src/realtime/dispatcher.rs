use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

use super::messages::CompetitionEvent;

pub type SessionId = Uuid;

/// Name of the broadcast group for a judge
pub fn group_name(judge_id: i64) -> String {
    format!("juez_{}", judge_id)
}

/// In-process group messaging.
///
/// Each joined session owns the receiving half of a bounded channel. Joins,
/// leaves and publishes take the same lock, so a session joined after
/// `publish` returns never sees that event.
pub struct BroadcastDispatcher {
    groups: Mutex<HashMap<String, HashMap<SessionId, mpsc::Sender<CompetitionEvent>>>>,
    capacity: usize,
}

impl BroadcastDispatcher {
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Add a session to `group` and return the stream of its events
    pub fn join(&self, group: &str, session_id: SessionId) -> mpsc::Receiver<CompetitionEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.groups
            .lock()
            .entry(group.to_string())
            .or_default()
            .insert(session_id, tx);

        debug!(group, %session_id, "Session joined group");
        rx
    }

    /// Remove a session; returns false if it was not a member
    pub fn leave(&self, group: &str, session_id: SessionId) -> bool {
        let mut groups = self.groups.lock();
        let Some(members) = groups.get_mut(group) else {
            return false;
        };

        let removed = members.remove(&session_id).is_some();
        if members.is_empty() {
            groups.remove(group);
        }

        debug!(group, %session_id, removed, "Session left group");
        removed
    }

    /// Deliver `event` to every session currently in `group`.
    ///
    /// Delivery is best-effort per session: a full or closed channel is
    /// logged and skipped. Returns the number of sessions that accepted it.
    pub fn publish(&self, group: &str, event: &CompetitionEvent) -> usize {
        let mut groups = self.groups.lock();
        let Some(members) = groups.get_mut(group) else {
            return 0;
        };

        let mut delivered = 0;
        members.retain(|session_id, tx| match tx.try_send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(group, %session_id, "Session buffer full, dropping event");
                true
            }
            Err(TrySendError::Closed(_)) => {
                debug!(group, %session_id, "Pruning closed session");
                false
            }
        });

        if members.is_empty() {
            groups.remove(group);
        }

        delivered
    }

    pub fn group_size(&self, group: &str) -> usize {
        self.groups.lock().get(group).map_or(0, HashMap::len)
    }
}
