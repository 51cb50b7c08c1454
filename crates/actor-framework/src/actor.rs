//! # Generic Actor Server
//!
//! `ResourceActor` owns every entity of one type and processes requests for them one at a
//! time, so each entity has exactly one mutation point and no locks are needed.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor (server) and a client (interface).
/// 2.  **Wire**: pass dependencies into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// # Operations
///
/// * **FindOrCreate**: derives the key with [`ActorEntity::key_for`]. A known key returns the
///   stored entity. A new key gets a fresh UUID id, `from_create_params`, then `on_create`;
///   only if both succeed is the entity stored and indexed. Because requests are processed
///   sequentially, two concurrent callers with the same key always observe the same entity.
/// * **Get**: clone of the entity, or `None`.
/// * **Lookup**: the id indexed under a key, or `None`, straight from the index.
/// * **Action**: `handle_action` on the stored entity; unknown ids are `NotFound`.
/// * **Query**: `handle_query` over all stored entities.
///
/// Entity errors are expected outcomes (validation, permissions) and are logged at `debug`.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    index: HashMap<T::Key, T::Id>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the mailbox capacity. When it is full, client calls wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            index: HashMap::new(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::FindOrCreate { params, respond_to } => {
                    let result = self.find_or_create(params, &context, entity_type).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Lookup { key, respond_to } => {
                    let id = self.index.get(&key).cloned();
                    debug!(entity_type, ?key, found = id.is_some(), "Lookup");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        debug!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(FrameworkError::Entity);
                    match &result {
                        Ok(_) => debug!(entity_type, %id, "Action ok"),
                        Err(e) => debug!(entity_type, %id, error = %e, "Action rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Query { query, respond_to } => {
                    debug!(entity_type, ?query, "Query");
                    let result =
                        T::handle_query(self.store.values(), query).map_err(FrameworkError::Entity);
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn find_or_create(
        &mut self,
        params: T::Create,
        context: &T::Context,
        entity_type: &str,
    ) -> Result<T, FrameworkError<T::Error>> {
        let key = T::key_for(&params);
        if let Some(existing) = self.index.get(&key).and_then(|id| self.store.get(id)) {
            debug!(entity_type, ?key, "Found existing");
            return Ok(existing.clone());
        }

        let id = T::Id::from(Uuid::new_v4());
        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            debug!(entity_type, error = %e, "Create rejected");
            FrameworkError::Entity(e)
        })?;
        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, %id, error = %e, "on_create failed");
            return Err(FrameworkError::Entity(e));
        }

        self.index.insert(key, id.clone());
        self.store.insert(id.clone(), item.clone());
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(item)
    }
}
