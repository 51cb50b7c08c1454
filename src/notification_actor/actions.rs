use crate::model::{InboxTotals, Notification, NotificationDraft, NotificationId, NotificationList};

#[derive(Debug, Clone)]
pub enum InboxAction {
    /// Insert at the head, evicting the oldest entry when the inbox is full. A draft whose id
    /// is already stored returns the stored entry.
    Append(NotificationDraft),
    List { unread_only: bool },
    MarkRead(NotificationId),
    MarkAllRead,
    Delete(NotificationId),
}

/// Variants match 1:1 with [`InboxAction`].
#[derive(Debug, Clone)]
pub enum InboxActionResult {
    Appended(Notification),
    Listed(NotificationList),
    MarkedRead(Notification),
    /// How many entries changed.
    MarkedAllRead(usize),
    Deleted(Notification),
}

#[derive(Debug, Clone)]
pub enum InboxQuery {
    Totals,
}

pub type InboxQueryResult = InboxTotals;
