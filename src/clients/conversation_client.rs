//! # Conversation Client
//!
//! Caller-facing API of the conversation store. Every method takes the authenticated
//! [`CallerContext`]; the sender or reader is always the caller. There is no raw `get` or
//! `query`: whole threads never leave the store without a participant check.
use crate::context::CallerContext;
use crate::conversation_actor::{ConversationAction, ConversationActionResult, ConversationQuery};
use crate::error::RelayError;
use crate::model::{
    Conversation, ConversationId, ConversationOpen, ConversationThread, ConversationView, Message,
    MessageDraft, OrderId, UserId,
};
use actor_framework::ResourceClient;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Handle to the conversation store.
///
/// Reading a thread always goes through [`ConversationClient::messages`]:
///
/// ```compile_fail
/// use actor_framework::ActorClient;
/// use service_relay::clients::ConversationClient;
/// use service_relay::model::ConversationId;
///
/// async fn peek(client: &ConversationClient, id: ConversationId) {
///     let _ = ActorClient::get(client, id).await;
/// }
/// ```
#[derive(Clone)]
pub struct ConversationClient {
    inner: ResourceClient<ConversationThread>,
}

impl ConversationClient {
    pub fn new(inner: ResourceClient<ConversationThread>) -> Self {
        Self { inner }
    }

    /// Finds or creates the conversation between the caller and `other`, optionally scoped to
    /// an order. Concurrent calls for the same pair and order return the same conversation.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn open(
        &self,
        caller: &CallerContext,
        other: UserId,
        order_id: Option<OrderId>,
    ) -> Result<Conversation, RelayError> {
        let params = ConversationOpen::new(caller.user_id.clone(), other, order_id);
        let thread = self.inner.find_or_create(params).await?;
        Ok(thread.conversation)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn list_for(&self, caller: &CallerContext) -> Result<Vec<ConversationView>, RelayError> {
        debug!("Listing conversations");
        Ok(self
            .inner
            .query(ConversationQuery::ForUser(caller.user_id.clone()))
            .await?)
    }

    /// A page of history in ascending order, ending just before `before` (exclusive).
    /// Also marks everything the other participant sent as read.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn messages(
        &self,
        caller: &CallerContext,
        conversation_id: ConversationId,
        before: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, RelayError> {
        let action = ConversationAction::Read {
            reader: caller.user_id.clone(),
            before,
            limit,
        };
        match self.inner.perform_action(conversation_id, action).await? {
            ConversationActionResult::Read(page) => Ok(page),
            _ => unreachable!("Read action must return Read result"),
        }
    }

    #[instrument(skip(self, caller, draft), fields(caller = %caller.user_id, kind = ?draft.kind))]
    pub async fn post(
        &self,
        caller: &CallerContext,
        conversation_id: ConversationId,
        draft: MessageDraft,
    ) -> Result<Message, RelayError> {
        let action = ConversationAction::Post {
            sender: caller.user_id.clone(),
            draft,
        };
        match self.inner.perform_action(conversation_id, action).await? {
            ConversationActionResult::Posted(message) => Ok(message),
            _ => unreachable!("Post action must return Posted result"),
        }
    }

    /// Posts a location-kind message.
    pub async fn share_location(
        &self,
        caller: &CallerContext,
        conversation_id: ConversationId,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> Result<Message, RelayError> {
        self.post(
            caller,
            conversation_id,
            MessageDraft::location(latitude, longitude, address),
        )
        .await
    }
}
