//! # Live Session
//!
//! One persistent connection of one authenticated caller. The transport (websocket, SSE, ...)
//! lives outside the crate: it feeds inbound text frames to [`LiveSession::handle_frame`] and
//! writes whatever [`LiveSession::next_event`] yields, serialised with
//! [`LiveEvent::to_frame`].
//!
//! Control frames:
//!
//! ```json
//! {"type": "join", "user_id": "u1"}
//! {"type": "watch_order", "order_id": "ord_1"}
//! {"type": "unwatch_order", "order_id": "ord_1"}
//! ```
//!
//! Nothing outlives the session. Dropping it removes the connection from every topic, and a
//! reconnecting client has to `join` again.

use crate::clients::CoordinatorClient;
use crate::context::{CallerContext, Role};
use crate::error::RelayError;
use crate::model::{ConnectionId, LiveEvent, OrderId, UserId};
use crate::room::{Publisher, RoomRegistry, Topic};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    Join { user_id: UserId },
    WatchOrder { order_id: OrderId },
    UnwatchOrder { order_id: OrderId },
}

pub struct LiveSession {
    registry: Arc<RoomRegistry>,
    coordinator: CoordinatorClient,
    caller: CallerContext,
    connection: ConnectionId,
    events: mpsc::UnboundedReceiver<LiveEvent>,
}

impl LiveSession {
    pub fn open(
        registry: Arc<RoomRegistry>,
        coordinator: CoordinatorClient,
        caller: CallerContext,
    ) -> Self {
        let (connection, events) = registry.connect();
        debug!(connection = %connection, caller = %caller.user_id, "Session opened");
        Self {
            registry,
            coordinator,
            caller,
            connection,
            events,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn caller(&self) -> &CallerContext {
        &self.caller
    }

    /// Parses and applies one inbound text frame.
    pub async fn handle_frame(&self, frame: &str) -> Result<(), RelayError> {
        let message: ControlMessage = serde_json::from_str(frame)
            .map_err(|e| RelayError::validation(format!("malformed control frame: {e}")))?;
        self.handle(message).await
    }

    #[instrument(skip(self), fields(connection = %self.connection, caller = %self.caller.user_id))]
    pub async fn handle(&self, message: ControlMessage) -> Result<(), RelayError> {
        match message {
            ControlMessage::Join { user_id } => {
                if !self.caller.is(&user_id) {
                    return Err(RelayError::forbidden("cannot join another user's topic"));
                }
                self.registry.join(self.connection, Topic::User(user_id))?;
                if self.caller.role == Role::Provider {
                    self.registry.join(self.connection, Topic::Providers)?;
                }
                Ok(())
            }
            ControlMessage::WatchOrder { order_id } => {
                self.coordinator
                    .authorize_watch(&self.caller, order_id.clone())
                    .await?;
                self.registry.join(self.connection, Topic::Order(order_id))
            }
            ControlMessage::UnwatchOrder { order_id } => {
                self.registry.leave(self.connection, &Topic::Order(order_id));
                Ok(())
            }
        }
    }

    /// Waits for the next event. `None` once the connection has been removed from the registry.
    pub async fn next_event(&mut self) -> Option<LiveEvent> {
        self.events.recv().await
    }

    /// The next already-delivered event, if any.
    pub fn try_next_event(&mut self) -> Option<LiveEvent> {
        self.events.try_recv().ok()
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.registry.disconnect(self.connection);
    }
}
