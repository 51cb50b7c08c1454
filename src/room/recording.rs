use super::{Publisher, Topic};
use crate::error::RelayError;
use crate::model::{ConnectionId, LiveEvent};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Publisher that drops everything. For wiring actors that need no live channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn join(&self, _connection: ConnectionId, _topic: Topic) -> Result<(), RelayError> {
        Ok(())
    }

    fn leave(&self, _connection: ConnectionId, _topic: &Topic) {}

    fn publish(&self, _topic: &Topic, _event: &LiveEvent) -> usize {
        0
    }

    fn publish_direct(&self, _connections: &[ConnectionId], _event: &LiveEvent) -> usize {
        0
    }
}

/// Publisher that keeps every published event, in order, for assertions.
///
/// It also tracks `join`/`leave`, so the counts it returns are the number of connections an
/// event would have reached.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(Topic, LiveEvent)>>,
    direct: Mutex<Vec<(Vec<ConnectionId>, LiveEvent)>>,
    subscribers: Mutex<HashMap<Topic, HashSet<ConnectionId>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published to a topic so far.
    pub fn published(&self) -> Vec<(Topic, LiveEvent)> {
        self.published
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Every `publish_direct` call so far, with the connections it targeted.
    pub fn direct(&self) -> Vec<(Vec<ConnectionId>, LiveEvent)> {
        self.direct
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events published to one topic, in order.
    pub fn events_for(&self, topic: &Topic) -> Vec<LiveEvent> {
        self.published()
            .into_iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, event)| event)
            .collect()
    }

    /// Wire names of events published to one topic, in order.
    pub fn names_for(&self, topic: &Topic) -> Vec<&'static str> {
        self.events_for(topic).iter().map(LiveEvent::name).collect()
    }

    /// Forgets recorded events. Subscriptions are kept.
    pub fn clear(&self) {
        if let Ok(mut events) = self.published.lock() {
            events.clear();
        }
        if let Ok(mut events) = self.direct.lock() {
            events.clear();
        }
    }

    fn is_subscribed(&self, connection: ConnectionId) -> bool {
        self.subscribers
            .lock()
            .map(|subs| subs.values().any(|set| set.contains(&connection)))
            .unwrap_or(false)
    }
}

impl Publisher for RecordingPublisher {
    fn join(&self, connection: ConnectionId, topic: Topic) -> Result<(), RelayError> {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.entry(topic).or_default().insert(connection);
        }
        Ok(())
    }

    fn leave(&self, connection: ConnectionId, topic: &Topic) {
        if let Ok(mut subs) = self.subscribers.lock() {
            if let Some(set) = subs.get_mut(topic) {
                set.remove(&connection);
            }
        }
    }

    fn publish(&self, topic: &Topic, event: &LiveEvent) -> usize {
        if let Ok(mut events) = self.published.lock() {
            events.push((topic.clone(), event.clone()));
        }
        self.subscribers
            .lock()
            .map(|subs| subs.get(topic).map(HashSet::len).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Counts targets that joined at least one topic.
    fn publish_direct(&self, connections: &[ConnectionId], event: &LiveEvent) -> usize {
        let reached = connections
            .iter()
            .filter(|connection| self.is_subscribed(**connection))
            .count();
        if let Ok(mut events) = self.direct.lock() {
            events.push((connections.to_vec(), event.clone()));
        }
        reached
    }
}
