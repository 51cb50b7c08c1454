//! Durable per-user notifications.

use crate::model::{InboxId, NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    OrderAccepted,
    OrderCompleted,
    OrderCancelled,
    NewReview,
    PaymentReceived,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub payload: Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// An entry waiting to be appended. The id is fixed when the draft is built, so appending the
/// same draft twice stores it once.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub payload: Value,
}

impl NotificationDraft {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            title: title.into(),
            message: message.into(),
            payload,
        }
    }
}

/// A page of a user's notifications plus their total unread count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub unread_count: usize,
}

/// Totals across every inbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxTotals {
    pub inboxes: usize,
    pub notifications: usize,
    pub unread: usize,
}

/// One user's notification log: newest first, never longer than `capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbox {
    pub id: InboxId,
    pub user_id: UserId,
    pub capacity: usize,
    pub entries: VecDeque<Notification>,
}

/// Find-or-create payload for an inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxOpen {
    pub user_id: UserId,
    pub capacity: usize,
}
