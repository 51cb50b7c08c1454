//! # Generic Client
//!
//! The sending half of a `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// A type-safe async handle to a `ResourceActor<T>`. Each call sends one request over the
/// mpsc mailbox and awaits the reply on a oneshot channel.
///
/// * **Cloneable**: holds only a sender.
/// * **Transport errors**: a closed mailbox is `ActorClosed`; a reply channel dropped without
///   an answer is `ActorDropped`.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError<T::Error>>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn find_or_create(&self, params: T::Create) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::FindOrCreate { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// The id of the entity created under `key`, without creating one.
    pub async fn lookup(&self, key: T::Key) -> Result<Option<T::Id>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Lookup { key, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    pub async fn query(&self, query: T::Query) -> Result<T::QueryResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Query { query, respond_to })
            .await
    }
}
