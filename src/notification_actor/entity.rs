//! [`ActorEntity`] implementation for [`Inbox`], a bounded newest-first log per user.

use super::actions::{InboxAction, InboxActionResult, InboxQuery, InboxQueryResult};
use crate::error::RelayError;
use crate::model::{
    Inbox, InboxId, InboxOpen, InboxTotals, Notification, NotificationDraft, NotificationId,
    NotificationList, UserId,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use tracing::debug;

#[async_trait]
impl ActorEntity for Inbox {
    type Id = InboxId;
    type Key = UserId;
    type Create = InboxOpen;
    type Action = InboxAction;
    type ActionResult = InboxActionResult;
    type Query = InboxQuery;
    type QueryResult = InboxQueryResult;
    type Context = ();
    type Error = RelayError;

    fn key_for(params: &InboxOpen) -> UserId {
        params.user_id.clone()
    }

    fn from_create_params(id: InboxId, params: InboxOpen) -> Result<Self, RelayError> {
        if params.capacity == 0 {
            return Err(RelayError::validation("inbox capacity must be at least 1"));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            capacity: params.capacity,
            entries: VecDeque::with_capacity(params.capacity),
        })
    }

    async fn handle_action(
        &mut self,
        action: InboxAction,
        _ctx: &(),
    ) -> Result<InboxActionResult, RelayError> {
        match action {
            InboxAction::Append(draft) => Ok(InboxActionResult::Appended(self.append(draft))),
            InboxAction::List { unread_only } => Ok(InboxActionResult::Listed(self.list(unread_only))),
            InboxAction::MarkRead(id) => {
                let entry = self.find_mut(id)?;
                entry.read = true;
                Ok(InboxActionResult::MarkedRead(entry.clone()))
            }
            InboxAction::MarkAllRead => {
                let mut changed = 0;
                for entry in self.entries.iter_mut().filter(|n| !n.read) {
                    entry.read = true;
                    changed += 1;
                }
                Ok(InboxActionResult::MarkedAllRead(changed))
            }
            InboxAction::Delete(id) => {
                let position = self
                    .entries
                    .iter()
                    .position(|n| n.id == id)
                    .ok_or_else(|| RelayError::not_found(id))?;
                let removed = self
                    .entries
                    .remove(position)
                    .ok_or_else(|| RelayError::not_found(id))?;
                Ok(InboxActionResult::Deleted(removed))
            }
        }
    }

    fn handle_query<'a, I>(inboxes: I, query: InboxQuery) -> Result<InboxQueryResult, RelayError>
    where
        I: Iterator<Item = &'a Self>,
    {
        match query {
            InboxQuery::Totals => Ok(inboxes.fold(InboxTotals::default(), |mut totals, inbox| {
                totals.inboxes += 1;
                totals.notifications += inbox.entries.len();
                totals.unread += inbox.unread_count();
                totals
            })),
        }
    }
}

impl Inbox {
    fn append(&mut self, draft: NotificationDraft) -> Notification {
        if let Some(existing) = self.entries.iter().find(|n| n.id == draft.id) {
            debug!(user = %self.user_id, id = %draft.id, "Draft already appended");
            return existing.clone();
        }
        let notification = Notification {
            id: draft.id,
            user_id: self.user_id.clone(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            payload: draft.payload,
            read: false,
            created_at: Utc::now(),
        };
        self.entries.push_front(notification.clone());
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                debug!(user = %self.user_id, evicted = %evicted.id, "Evicted oldest notification");
            }
        }
        notification
    }

    fn list(&self, unread_only: bool) -> NotificationList {
        NotificationList {
            items: self
                .entries
                .iter()
                .filter(|n| !unread_only || !n.read)
                .cloned()
                .collect(),
            unread_count: self.unread_count(),
        }
    }

    fn find_mut(&mut self, id: NotificationId) -> Result<&mut Notification, RelayError> {
        self.entries
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| RelayError::not_found(id))
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationKind;
    use serde_json::json;

    fn inbox(capacity: usize) -> Inbox {
        Inbox::from_create_params(
            InboxId::new(),
            InboxOpen {
                user_id: UserId::new("u1"),
                capacity,
            },
        )
        .unwrap()
    }

    fn draft(n: usize) -> NotificationDraft {
        NotificationDraft::new(
            NotificationKind::System,
            format!("n{n}"),
            "body",
            json!({ "n": n }),
        )
    }

    #[test]
    fn test_append_evicts_oldest_beyond_capacity() {
        let mut inbox = inbox(3);
        for n in 0..5 {
            inbox.append(draft(n));
        }
        let titles: Vec<_> = inbox.entries.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["n4", "n3", "n2"]);
    }

    #[test]
    fn test_list_counts_unread_across_whole_inbox() {
        let mut inbox = inbox(10);
        let first = inbox.append(draft(1));
        inbox.append(draft(2));
        inbox.find_mut(first.id).unwrap().read = true;

        let unread = inbox.list(true);
        assert_eq!(unread.items.len(), 1);
        assert_eq!(unread.unread_count, 1);

        let all = inbox.list(false);
        assert_eq!(all.items.len(), 2);
        assert_eq!(all.items[0].title, "n2");
    }

    #[test]
    fn test_appending_the_same_draft_twice_stores_it_once() {
        let mut inbox = inbox(10);
        let once = draft(1);

        let first = inbox.append(once.clone());
        let second = inbox.append(once);

        assert_eq!(first, second);
        assert_eq!(inbox.entries.len(), 1);
    }

    #[test]
    fn test_totals_span_every_inbox() {
        let mut mine = inbox(10);
        mine.append(draft(1));
        mine.append(draft(2));
        mine.entries[0].read = true;
        let mut theirs = inbox(10);
        theirs.append(draft(3));
        theirs.entries[0].read = true;

        let totals = Inbox::handle_query([&mine, &theirs].into_iter(), InboxQuery::Totals).unwrap();
        assert_eq!(
            totals,
            InboxTotals {
                inboxes: 2,
                notifications: 3,
                unread: 1,
            }
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = Inbox::from_create_params(
            InboxId::new(),
            InboxOpen {
                user_id: UserId::new("u1"),
                capacity: 0,
            },
        );
        assert!(matches!(result, Err(RelayError::Validation(_))));
    }
}
