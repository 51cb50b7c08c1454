//! # Generic Messages
//!
//! The request envelope passed from `ResourceClient` to `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

/// Message sent to a `ResourceActor`.
///
/// - **FindOrCreate**: returns the entity stored under the payload's key, creating it first if
///   the key is new.
/// - **Get**: fetches one entity by ID.
/// - **Lookup**: resolves a natural key to the ID it is indexed under.
/// - **Action**: runs [`ActorEntity::Action`] against one entity.
/// - **Query**: runs [`ActorEntity::Query`] against all entities, read-only.
///
/// There is no delete: resources here are append-only histories.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    FindOrCreate {
        params: T::Create,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    Lookup {
        key: T::Key,
        respond_to: Response<Option<T::Id>, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    Query {
        query: T::Query,
        respond_to: Response<T::QueryResult, T::Error>,
    },
}
