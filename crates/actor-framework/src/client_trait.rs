//! # ActorClient Trait
//!
//! Shared surface for resource-specific client wrappers: `get` and `query` come for free once
//! a wrapper says how to reach its `ResourceClient` and how to translate framework errors.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients.
///
/// ```rust,ignore
/// #[async_trait]
/// impl ActorClient<Inbox> for NotificationClient {
///     type Error = RelayError;
///
///     fn inner(&self) -> &ResourceClient<Inbox> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError<RelayError>) -> RelayError {
///         RelayError::from(e)
///     }
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError<T::Error>) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Run a read-only query across all entities.
    #[tracing::instrument(skip(self))]
    async fn query(&self, query: T::Query) -> Result<T::QueryResult, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(query).await.map_err(Self::map_error)
    }
}
