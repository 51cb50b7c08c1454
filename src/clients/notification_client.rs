//! # Notification Client
//!
//! Inboxes are created lazily on the first append. Reads against a user who never received
//! anything see an empty inbox rather than creating one.
use crate::error::RelayError;
use crate::model::{
    Inbox, InboxId, InboxOpen, InboxTotals, Notification, NotificationDraft, NotificationId,
    NotificationList, UserId,
};
use crate::notification_actor::{InboxAction, InboxActionResult, InboxQuery};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Inbox>,
    retention: usize,
}

impl NotificationClient {
    pub fn new(inner: ResourceClient<Inbox>, retention: usize) -> Self {
        Self { inner, retention }
    }

    /// Appending a draft that is already stored returns the stored entry.
    #[instrument(skip(self, draft), fields(kind = ?draft.kind, id = %draft.id))]
    pub async fn append(
        &self,
        user_id: &UserId,
        draft: NotificationDraft,
    ) -> Result<Notification, RelayError> {
        let inbox = self
            .inner
            .find_or_create(InboxOpen {
                user_id: user_id.clone(),
                capacity: self.retention,
            })
            .await?;
        match self
            .inner
            .perform_action(inbox.id, InboxAction::Append(draft))
            .await?
        {
            InboxActionResult::Appended(notification) => Ok(notification),
            _ => unreachable!("Append action must return Appended result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: &UserId, unread_only: bool) -> Result<NotificationList, RelayError> {
        let Some(inbox) = self.inbox_of(user_id).await? else {
            debug!("No inbox yet");
            return Ok(NotificationList {
                items: Vec::new(),
                unread_count: 0,
            });
        };
        match self
            .inner
            .perform_action(inbox, InboxAction::List { unread_only })
            .await?
        {
            InboxActionResult::Listed(list) => Ok(list),
            _ => unreachable!("List action must return Listed result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: &UserId,
        id: NotificationId,
    ) -> Result<Notification, RelayError> {
        let inbox = self
            .inbox_of(user_id)
            .await?
            .ok_or_else(|| RelayError::not_found(id))?;
        match self
            .inner
            .perform_action(inbox, InboxAction::MarkRead(id))
            .await?
        {
            InboxActionResult::MarkedRead(notification) => Ok(notification),
            _ => unreachable!("MarkRead action must return MarkedRead result"),
        }
    }

    /// Returns how many notifications changed.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, RelayError> {
        let Some(inbox) = self.inbox_of(user_id).await? else {
            return Ok(0);
        };
        match self
            .inner
            .perform_action(inbox, InboxAction::MarkAllRead)
            .await?
        {
            InboxActionResult::MarkedAllRead(changed) => Ok(changed),
            _ => unreachable!("MarkAllRead action must return MarkedAllRead result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        user_id: &UserId,
        id: NotificationId,
    ) -> Result<Notification, RelayError> {
        let inbox = self
            .inbox_of(user_id)
            .await?
            .ok_or_else(|| RelayError::not_found(id))?;
        match self
            .inner
            .perform_action(inbox, InboxAction::Delete(id))
            .await?
        {
            InboxActionResult::Deleted(notification) => Ok(notification),
            _ => unreachable!("Delete action must return Deleted result"),
        }
    }

    /// Inbox, notification and unread counts across all users.
    #[instrument(skip(self))]
    pub async fn totals(&self) -> Result<InboxTotals, RelayError> {
        Ok(self.inner.query(InboxQuery::Totals).await?)
    }

    async fn inbox_of(&self, user_id: &UserId) -> Result<Option<InboxId>, RelayError> {
        Ok(self.inner.lookup(user_id.clone()).await?)
    }
}

#[async_trait]
impl ActorClient<Inbox> for NotificationClient {
    type Error = RelayError;

    fn inner(&self) -> &ResourceClient<Inbox> {
        &self.inner
    }

    fn map_error(e: FrameworkError<RelayError>) -> RelayError {
        e.into()
    }
}
