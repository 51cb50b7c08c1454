//! [`ActorEntity`] implementation for [`ConversationThread`].
//!
//! One actor owns every conversation, so a post and the unread counters it touches are updated
//! in the same turn, and a read that zeroes a counter cannot interleave with a post that bumps
//! it.

use super::actions::{
    ConversationAction, ConversationActionResult, ConversationQuery, ConversationQueryResult,
};
use super::ConversationContext;
use crate::error::{retry_once, RelayError};
use crate::model::{
    Conversation, ConversationId, Coordinates, ConversationOpen, ConversationThread, ConversationView,
    LiveEvent, Message, MessageDraft, MessageId, MessageKind, MessagePayload, OrderId, UserId,
};
use crate::room::Topic;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

#[async_trait]
impl ActorEntity for ConversationThread {
    type Id = ConversationId;
    type Key = ([UserId; 2], Option<OrderId>);
    type Create = ConversationOpen;
    type Action = ConversationAction;
    type ActionResult = ConversationActionResult;
    type Query = ConversationQuery;
    type QueryResult = ConversationQueryResult;
    type Context = ConversationContext;
    type Error = RelayError;

    fn key_for(params: &ConversationOpen) -> Self::Key {
        (params.participants.clone(), params.order_id.clone())
    }

    fn from_create_params(id: ConversationId, params: ConversationOpen) -> Result<Self, RelayError> {
        let [a, b] = &params.participants;
        if a == b {
            return Err(RelayError::validation(
                "a conversation needs two different participants",
            ));
        }
        let now = Utc::now();
        let unread = params
            .participants
            .iter()
            .map(|p| (p.clone(), 0))
            .collect::<HashMap<_, _>>();
        Ok(Self {
            conversation: Conversation {
                id,
                participants: params.participants,
                order_id: params.order_id,
                last_message: None,
                last_message_at: now,
                unread,
                created_at: now,
            },
            messages: Vec::new(),
        })
    }

    /// Both participants must exist in the user directory.
    async fn on_create(&mut self, ctx: &ConversationContext) -> Result<(), RelayError> {
        for participant in &self.conversation.participants {
            let found = retry_once("get_user", || ctx.users.get_user(participant)).await?;
            if found.is_none() {
                return Err(RelayError::not_found(format!("user {participant}")));
            }
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ConversationAction,
        ctx: &ConversationContext,
    ) -> Result<ConversationActionResult, RelayError> {
        match action {
            ConversationAction::Post { sender, draft } => {
                let message = self.post(sender, draft, ctx)?;
                Ok(ConversationActionResult::Posted(message))
            }
            ConversationAction::Read {
                reader,
                before,
                limit,
            } => {
                let limit = limit
                    .unwrap_or(ctx.limits.page_size)
                    .clamp(1, ctx.limits.max_page_size);
                let page = self.read(&reader, before, limit)?;
                Ok(ConversationActionResult::Read(page))
            }
        }
    }

    fn handle_query<'a, I>(
        entities: I,
        query: ConversationQuery,
    ) -> Result<ConversationQueryResult, RelayError>
    where
        I: Iterator<Item = &'a Self>,
    {
        match query {
            ConversationQuery::ForUser(user) => {
                let mut views: Vec<ConversationView> = entities
                    .filter(|thread| thread.conversation.has_participant(&user))
                    .map(|thread| ConversationView::for_user(&thread.conversation, &user))
                    .collect();
                views.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
                Ok(views)
            }
        }
    }
}

impl ConversationThread {
    fn require_participant(&self, user: &UserId) -> Result<(), RelayError> {
        if self.conversation.has_participant(user) {
            Ok(())
        } else {
            Err(RelayError::forbidden(format!(
                "{user} is not part of conversation {}",
                self.conversation.id
            )))
        }
    }

    /// Timestamps strictly increase within a conversation, so a `before` cursor never splits
    /// two messages sharing an instant.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.messages.last() {
            Some(last) if now <= last.created_at => last.created_at + Duration::microseconds(1),
            _ => now,
        }
    }

    fn post(
        &mut self,
        sender: UserId,
        draft: MessageDraft,
        ctx: &ConversationContext,
    ) -> Result<Message, RelayError> {
        self.require_participant(&sender)?;
        validate_draft(&draft, ctx.limits.max_body_len)?;

        let message = Message {
            id: MessageId::new(),
            conversation_id: self.conversation.id,
            sender_id: sender.clone(),
            body: draft.body,
            kind: draft.kind,
            payload: draft.payload,
            read: false,
            created_at: self.next_timestamp(),
        };

        let recipients: Vec<UserId> = self.conversation.others(&sender).cloned().collect();
        for recipient in &recipients {
            *self.conversation.unread.entry(recipient.clone()).or_insert(0) += 1;
        }
        self.conversation.last_message = Some(message.body.clone());
        self.conversation.last_message_at = message.created_at;
        self.messages.push(message.clone());

        info!(
            conversation = %self.conversation.id,
            message = %message.id,
            total = self.messages.len(),
            "Message posted"
        );

        for recipient in recipients {
            ctx.publisher
                .publish(&Topic::User(recipient), &LiveEvent::NewMessage(message.clone()));
        }
        Ok(message)
    }

    fn read(
        &mut self,
        reader: &UserId,
        before: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Message>, RelayError> {
        self.require_participant(reader)?;

        let end = match before {
            Some(cursor) => self.messages.partition_point(|m| m.created_at < cursor),
            None => self.messages.len(),
        };
        let start = end.saturating_sub(limit);

        let mut marked = 0;
        for message in self.messages.iter_mut() {
            if &message.sender_id != reader && !message.read {
                message.read = true;
                marked += 1;
            }
        }
        self.conversation.unread.insert(reader.clone(), 0);
        debug!(conversation = %self.conversation.id, reader = %reader, marked, "Marked read");

        Ok(self.messages[start..end].to_vec())
    }
}

fn validate_draft(draft: &MessageDraft, max_body_len: usize) -> Result<(), RelayError> {
    if draft.body.trim().is_empty() {
        return Err(RelayError::validation("message body must not be empty"));
    }
    let len = draft.body.chars().count();
    if len > max_body_len {
        return Err(RelayError::validation(format!(
            "message body is {len} characters, the limit is {max_body_len}"
        )));
    }

    match (draft.kind, &draft.payload) {
        (MessageKind::Text | MessageKind::System, None) => Ok(()),
        (MessageKind::Text | MessageKind::System, Some(_)) => Err(RelayError::validation(
            "text and system messages carry no payload",
        )),
        (MessageKind::Image, Some(MessagePayload::Image { url })) if !url.trim().is_empty() => {
            Ok(())
        }
        (MessageKind::Image, _) => Err(RelayError::validation("image messages need an image url")),
        (
            MessageKind::Location,
            Some(MessagePayload::Location {
                latitude,
                longitude,
                ..
            }),
        ) => {
            let coordinates = Coordinates::new(*latitude, *longitude);
            if coordinates.is_valid() {
                Ok(())
            } else {
                Err(RelayError::validation("location is out of range"))
            }
        }
        (MessageKind::Location, _) => Err(RelayError::validation(
            "location messages need latitude and longitude",
        )),
    }
}
