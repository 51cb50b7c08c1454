use crate::clients::{ConversationClient, CoordinatorClient, LocationClient, NotificationClient};
use crate::collaborators::Collaborators;
use crate::config::RelayConfig;
use crate::context::CallerContext;
use crate::conversation_actor::ConversationContext;
use crate::coordinator::CoordinatorContext;
use crate::error::RelayError;
use crate::location_actor::LocationContext;
use crate::room::{Publisher, RoomRegistry};
use crate::session::LiveSession;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running relay: every actor, the room registry, and a client for each.
///
/// # Example
///
/// ```ignore
/// let system = RelaySystem::new(&RelayConfig::default(), Collaborators::in_memory(users));
///
/// let order = system.coordinator.create(&requester, draft).await?;
/// let mut session = system.open_session(provider.clone());
/// session.handle_frame(r#"{"type":"join","user_id":"p1"}"#).await?;
///
/// drop(session);
/// system.shutdown().await?;
/// ```
pub struct RelaySystem {
    pub conversations: ConversationClient,
    pub locations: LocationClient,
    pub notifications: NotificationClient,
    pub coordinator: CoordinatorClient,
    pub registry: Arc<RoomRegistry>,
    handles: Vec<JoinHandle<()>>,
}

impl RelaySystem {
    /// Spawns all actors. Must be called inside a Tokio runtime.
    pub fn new(config: &RelayConfig, collaborators: Collaborators) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let publisher: Arc<dyn Publisher> = registry.clone();
        let mailbox = config.mailbox_capacity;

        // 1. Create actors, no dependencies yet
        let (conversation_actor, conversations) = crate::conversation_actor::new(mailbox);
        let (location_actor, locations) =
            crate::location_actor::new(mailbox, config.locations.clone());
        let (notification_actor, notifications) =
            crate::notification_actor::new(mailbox, config.notifications.retention);
        let (coordinator_actor, coordinator) = crate::coordinator::new(mailbox);

        // 2. Start them with their contexts
        let conversation_handle = tokio::spawn(conversation_actor.run(ConversationContext {
            publisher: publisher.clone(),
            users: collaborators.users.clone(),
            limits: config.conversations.clone(),
        }));
        let location_handle = tokio::spawn(location_actor.run(LocationContext {
            publisher: publisher.clone(),
        }));
        let notification_handle = tokio::spawn(notification_actor.run(()));
        let coordinator_handle = tokio::spawn(coordinator_actor.run(CoordinatorContext {
            orders: collaborators.orders,
            profiles: collaborators.profiles,
            notifications: notifications.clone(),
            publisher,
        }));

        info!(mailbox, "Relay started");
        Self {
            conversations,
            locations,
            notifications,
            coordinator,
            registry,
            handles: vec![
                coordinator_handle,
                conversation_handle,
                location_handle,
                notification_handle,
            ],
        }
    }

    /// Opens a live connection for an authenticated caller.
    pub fn open_session(&self, caller: CallerContext) -> LiveSession {
        LiveSession::open(self.registry.clone(), self.coordinator.clone(), caller)
    }

    /// Drops every client and waits for the actors to drain.
    ///
    /// Sessions and cloned clients keep their actors alive; drop them before calling this.
    pub async fn shutdown(self) -> Result<(), RelayError> {
        info!("Shutting down relay...");

        drop(self.coordinator);
        drop(self.conversations);
        drop(self.locations);
        drop(self.notifications);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(RelayError::Unavailable(format!("actor task failed: {e}")));
            }
        }

        info!(
            connections = self.registry.connection_count(),
            "Relay shutdown complete"
        );
        Ok(())
    }
}
