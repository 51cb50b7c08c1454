use super::{Publisher, Topic};
use crate::error::RelayError;
use crate::model::{ConnectionId, LiveEvent};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};

type EventSender = mpsc::UnboundedSender<LiveEvent>;

struct Connection {
    sender: EventSender,
    topics: HashSet<Topic>,
}

/// In-process subscription table.
///
/// Two sharded maps: connection -> (sender, topics) and topic -> subscribers. Lock order is
/// always `connections` before `topics`, and no guard is held while touching another shard
/// of the same map.
pub struct RoomRegistry {
    next_connection: AtomicU64,
    connections: DashMap<ConnectionId, Connection>,
    topics: DashMap<Topic, HashMap<ConnectionId, EventSender>>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            next_connection: AtomicU64::new(1),
            connections: DashMap::new(),
            topics: DashMap::new(),
        }
    }

    /// Registers a new live connection and returns the receiving end of its event stream.
    pub fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<LiveEvent>) {
        let id = ConnectionId(self.next_connection.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connections.insert(
            id,
            Connection {
                sender,
                topics: HashSet::new(),
            },
        );
        info!(connection = %id, live = self.connections.len(), "Connected");
        (id, receiver)
    }

    /// Drops the connection from every topic it joined. Unknown ids are ignored.
    pub fn disconnect(&self, connection: ConnectionId) {
        let Some((_, entry)) = self.connections.remove(&connection) else {
            return;
        };
        for topic in &entry.topics {
            self.remove_subscriber(topic, connection);
        }
        info!(connection = %connection, topics = entry.topics.len(), "Disconnected");
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map(|subs| subs.len()).unwrap_or(0)
    }

    pub fn topics_of(&self, connection: ConnectionId) -> Vec<Topic> {
        self.connections
            .get(&connection)
            .map(|entry| entry.topics.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn remove_subscriber(&self, topic: &Topic, connection: ConnectionId) {
        if let Some(mut subs) = self.topics.get_mut(topic) {
            subs.remove(&connection);
        }
        self.topics.remove_if(topic, |_, subs| subs.is_empty());
    }
}

impl Publisher for RoomRegistry {
    fn join(&self, connection: ConnectionId, topic: Topic) -> Result<(), RelayError> {
        let mut entry = self
            .connections
            .get_mut(&connection)
            .ok_or_else(|| RelayError::not_found(connection))?;
        if !entry.topics.insert(topic.clone()) {
            return Ok(());
        }
        // Still holding the connection entry, so a concurrent disconnect cannot miss this topic.
        self.topics
            .entry(topic.clone())
            .or_default()
            .insert(connection, entry.sender.clone());
        debug!(connection = %connection, topic = %topic, "Joined");
        Ok(())
    }

    fn leave(&self, connection: ConnectionId, topic: &Topic) {
        let Some(mut entry) = self.connections.get_mut(&connection) else {
            return;
        };
        if entry.topics.remove(topic) {
            self.remove_subscriber(topic, connection);
            debug!(connection = %connection, topic = %topic, "Left");
        }
    }

    fn publish(&self, topic: &Topic, event: &LiveEvent) -> usize {
        let Some(subs) = self.topics.get(topic) else {
            debug!(topic = %topic, event = event.name(), "No subscribers");
            return 0;
        };
        let mut delivered = 0;
        for (connection, sender) in subs.iter() {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!(connection = %connection, topic = %topic, "Dropped event for dead connection");
            }
        }
        debug!(topic = %topic, event = event.name(), delivered, "Published");
        delivered
    }

    fn publish_direct(&self, connections: &[ConnectionId], event: &LiveEvent) -> usize {
        connections
            .iter()
            .filter(|id| {
                self.connections
                    .get(*id)
                    .is_some_and(|entry| entry.sender.send(event.clone()).is_ok())
            })
            .count()
    }
}
