//! Conversation store: conversations, their messages and per-participant unread counters.

pub mod actions;
pub mod entity;

pub use actions::*;

use crate::clients::ConversationClient;
use crate::collaborators::UserDirectory;
use crate::config::ConversationConfig;
use crate::model::ConversationThread;
use crate::room::Publisher;
use actor_framework::ResourceActor;
use std::sync::Arc;

/// Dependencies injected into the conversation actor via `run(context)`.
#[derive(Clone)]
pub struct ConversationContext {
    pub publisher: Arc<dyn Publisher>,
    pub users: Arc<dyn UserDirectory>,
    pub limits: ConversationConfig,
}

/// Creates a new conversation actor and its client.
pub fn new(mailbox_capacity: usize) -> (ResourceActor<ConversationThread>, ConversationClient) {
    let (actor, client) = ResourceActor::new(mailbox_capacity);
    (actor, ConversationClient::new(client))
}
