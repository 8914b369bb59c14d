use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::ids::{PartyId, ThreadRef};

/// Capability of records that carry a notification thread with followers.
pub trait MailThread {
    /// Reference used to address the record's feed on the hub.
    fn thread_ref(&self) -> ThreadRef;

    /// Parties currently following the record.
    fn follower_ids(&self) -> &BTreeSet<PartyId>;
}

/// Errors raised by a notification hub.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("subscription to {thread} rejected: {reason}")]
    Rejected { thread: String, reason: String },
    #[error("notification hub unavailable: {0}")]
    Unavailable(String),
}

/// Outbound port to the host's notification subsystem.
pub trait NotificationHub {
    /// Subscribes `parties` to the feed of `thread`.
    fn subscribe(&mut self, thread: ThreadRef, parties: &BTreeSet<PartyId>)
        -> Result<(), HubError>;

    /// Records value changes of tracked fields on the thread.
    ///
    /// Hubs without a chatter ignore tracking.
    fn post_tracking(
        &mut self,
        _thread: ThreadRef,
        _changes: &[TrackedChange],
    ) -> Result<(), HubError> {
        Ok(())
    }
}

/// Before/after values of a tracked field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedChange {
    pub field: &'static str,
    pub old: Value,
    pub new: Value,
}

impl TrackedChange {
    pub fn new(field: &'static str, old: Value, new: Value) -> Self {
        Self { field, old, new }
    }
}

/// Subscription request received by a [`MemoryHub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeRequest {
    pub thread: ThreadRef,
    pub parties: BTreeSet<PartyId>,
}

/// In-memory hub keeping followers per thread and a log of every request.
#[derive(Debug, Default)]
pub struct MemoryHub {
    followers: BTreeMap<ThreadRef, BTreeSet<PartyId>>,
    requests: Vec<SubscribeRequest>,
    tracking: Vec<(ThreadRef, Vec<TrackedChange>)>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current followers of `thread`.
    pub fn followers(&self, thread: ThreadRef) -> BTreeSet<PartyId> {
        self.followers.get(&thread).cloned().unwrap_or_default()
    }

    /// Subscription requests in the order they were received.
    pub fn requests(&self) -> &[SubscribeRequest] {
        &self.requests
    }

    /// Tracking messages in the order they were posted.
    pub fn tracking(&self) -> &[(ThreadRef, Vec<TrackedChange>)] {
        &self.tracking
    }
}

impl NotificationHub for MemoryHub {
    fn subscribe(
        &mut self,
        thread: ThreadRef,
        parties: &BTreeSet<PartyId>,
    ) -> Result<(), HubError> {
        if parties.is_empty() {
            return Ok(());
        }

        self.followers
            .entry(thread)
            .or_default()
            .extend(parties.iter().copied());
        self.requests.push(SubscribeRequest {
            thread,
            parties: parties.clone(),
        });
        Ok(())
    }

    fn post_tracking(
        &mut self,
        thread: ThreadRef,
        changes: &[TrackedChange],
    ) -> Result<(), HubError> {
        if !changes.is_empty() {
            self.tracking.push((thread, changes.to_vec()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parties(ids: &[u64]) -> BTreeSet<PartyId> {
        ids.iter().copied().map(PartyId).collect()
    }

    #[test]
    fn subscribe_accumulates_followers() {
        let mut hub = MemoryHub::new();
        let thread = ThreadRef::new("sports.patient.injury", 1);

        hub.subscribe(thread, &parties(&[1, 2])).expect("subscribe");
        hub.subscribe(thread, &parties(&[3])).expect("subscribe");

        assert_eq!(hub.followers(thread), parties(&[1, 2, 3]));
        assert_eq!(hub.requests().len(), 2);
    }

    #[test]
    fn empty_subscription_is_not_recorded() {
        let mut hub = MemoryHub::new();
        let thread = ThreadRef::new("sports.patient.injury", 1);

        hub.subscribe(thread, &BTreeSet::new()).expect("subscribe");

        assert!(hub.requests().is_empty());
        assert!(hub.followers(thread).is_empty());
    }

    #[test]
    fn tracking_messages_are_kept_per_thread() {
        let mut hub = MemoryHub::new();
        let thread = ThreadRef::new("sports.patient.injury", 9);
        let change = TrackedChange::new("diagnosis", json!(null), json!("ACL tear"));

        hub.post_tracking(thread, &[change.clone()]).expect("post");
        hub.post_tracking(thread, &[]).expect("post");

        assert_eq!(hub.tracking(), &[(thread, vec![change])]);
    }
}
