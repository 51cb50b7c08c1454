//! Two-party conversations and their messages.

use crate::model::{ConversationId, MessageId, OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Location,
    System,
}

/// Structured content for non-text messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    Image {
        url: String,
    },
    Location {
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub kind: MessageKind,
    pub payload: Option<MessagePayload>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// What a sender submits.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub body: String,
    pub kind: MessageKind,
    pub payload: Option<MessagePayload>,
}

impl MessageDraft {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            kind: MessageKind::Text,
            payload: None,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            body: "Shared an image".to_string(),
            kind: MessageKind::Image,
            payload: Some(MessagePayload::Image { url: url.into() }),
        }
    }

    /// A shared location. The body falls back to the address, then to a fixed label.
    pub fn location(latitude: f64, longitude: f64, address: Option<String>) -> Self {
        let body = address
            .clone()
            .unwrap_or_else(|| "Shared a location".to_string());
        Self {
            body,
            kind: MessageKind::Location,
            payload: Some(MessagePayload::Location {
                latitude,
                longitude,
                address,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// Sorted, so `(a, b)` and `(b, a)` name the same conversation.
    pub participants: [UserId; 2],
    pub order_id: Option<OrderId>,
    pub last_message: Option<String>,
    pub last_message_at: DateTime<Utc>,
    pub unread: HashMap<UserId, u32>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    pub fn others<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a UserId> + 'a {
        self.participants.iter().filter(move |p| *p != user)
    }

    pub fn unread_for(&self, user: &UserId) -> u32 {
        self.unread.get(user).copied().unwrap_or(0)
    }
}

/// A conversation as listed for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationView {
    pub id: ConversationId,
    pub participants: [UserId; 2],
    pub order_id: Option<OrderId>,
    pub last_message: Option<String>,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: u32,
}

impl ConversationView {
    pub fn for_user(conversation: &Conversation, user: &UserId) -> Self {
        Self {
            id: conversation.id,
            participants: conversation.participants.clone(),
            order_id: conversation.order_id.clone(),
            last_message: conversation.last_message.clone(),
            last_message_at: conversation.last_message_at,
            unread_count: conversation.unread_for(user),
        }
    }
}

/// Find-or-create payload. Construct with [`ConversationOpen::new`] so the pair is sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOpen {
    pub participants: [UserId; 2],
    pub order_id: Option<OrderId>,
}

impl ConversationOpen {
    pub fn new(a: UserId, b: UserId, order_id: Option<OrderId>) -> Self {
        let participants = if a <= b { [a, b] } else { [b, a] };
        Self {
            participants,
            order_id,
        }
    }
}

/// A conversation together with its full message history, stored in timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationThread {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}
