//! Actions and queries for the conversation actor.

use crate::model::{ConversationView, Message, MessageDraft, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum ConversationAction {
    /// Append a message and bump every other participant's unread counter.
    Post { sender: UserId, draft: MessageDraft },
    /// Page backwards through history and mark the reader as caught up.
    ///
    /// `before` is an exclusive cursor. `limit` falls back to the configured page size.
    Read {
        reader: UserId,
        before: Option<DateTime<Utc>>,
        limit: Option<usize>,
    },
}

/// Variants match 1:1 with [`ConversationAction`].
#[derive(Debug, Clone)]
pub enum ConversationActionResult {
    Posted(Message),
    Read(Vec<Message>),
}

#[derive(Debug, Clone)]
pub enum ConversationQuery {
    /// Every conversation the user takes part in, most recently active first.
    ForUser(UserId),
}

pub type ConversationQueryResult = Vec<ConversationView>;
