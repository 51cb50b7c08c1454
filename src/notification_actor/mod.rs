//! Notification log: one bounded inbox per user.
//!
//! The log stores and serves; it never publishes. Whoever appends decides whether the
//! recipient also gets a live `notification` event.

pub mod actions;
pub mod entity;

pub use actions::*;

use crate::clients::NotificationClient;
use crate::model::Inbox;
use actor_framework::ResourceActor;

/// Creates a new notification actor and its client. `retention` caps each inbox.
pub fn new(mailbox_capacity: usize, retention: usize) -> (ResourceActor<Inbox>, NotificationClient) {
    let (actor, client) = ResourceActor::new(mailbox_capacity);
    (actor, NotificationClient::new(client, retention))
}
