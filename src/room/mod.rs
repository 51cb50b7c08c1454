//! # Room Registry
//!
//! Maps topics (a user, an order, the provider broadcast) to the live connections subscribed
//! to them, and fans events out to those connections.
//!
//! Producers only see the [`Publisher`] trait. [`RoomRegistry`] is the in-process
//! implementation; [`RecordingPublisher`] captures traffic for tests.
//!
//! ## Delivery
//!
//! Every connection owns an unbounded FIFO channel, and each topic has a single producer (the
//! actor or coordinator that owns the underlying state), so events on one topic arrive in
//! publish order. Publishing never waits on a consumer. A connection whose receiver is gone
//! is skipped.

mod recording;
mod registry;

pub use recording::{NoopPublisher, RecordingPublisher};
pub use registry::RoomRegistry;

use crate::error::RelayError;
use crate::model::{ConnectionId, LiveEvent, OrderId, UserId};
use std::fmt;

/// A subscription key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    User(UserId),
    Order(OrderId),
    Providers,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::User(id) => write!(f, "user:{id}"),
            Topic::Order(id) => write!(f, "order:{id}"),
            Topic::Providers => f.write_str("broadcast:providers"),
        }
    }
}

/// Fan-out surface used by everything that produces live events.
pub trait Publisher: Send + Sync {
    /// Subscribe a connection to a topic. Idempotent.
    fn join(&self, connection: ConnectionId, topic: Topic) -> Result<(), RelayError>;

    /// Unsubscribe. Idempotent.
    fn leave(&self, connection: ConnectionId, topic: &Topic);

    /// Deliver to every current subscriber. Returns how many connections accepted it;
    /// no subscribers is not an error.
    fn publish(&self, topic: &Topic, event: &LiveEvent) -> usize;

    /// Deliver to specific connections regardless of their topics.
    fn publish_direct(&self, connections: &[ConnectionId], event: &LiveEvent) -> usize;
}
