//! # ActorEntity Trait
//!
//! The contract every resource managed by a [`ResourceActor`](crate::ResourceActor) implements.
//! A resource is identified twice:
//!
//! - by its **Id**, generated by the actor (UUID v4) when the resource first appears;
//! - by its **Key**, the natural identity derived from the creation payload (for example
//!   "the conversation between these two users about this order").
//!
//! The actor keeps a `Key -> Id` index so creation is *find-or-create*: a second request with
//! the same key returns the resource that already exists instead of a duplicate.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] defaults to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are async so they can await collaborators. The `Context` associated type is
/// injected into every hook by `run(context)`, which keeps dependencies out of `new()`.
///
/// # Atomicity
/// `handle_action` runs inside the actor's single processing loop, so no other request for
/// any entity of this type interleaves with it. Implementations must validate before they
/// mutate: an action that returns `Err` is expected to leave the entity untouched.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The generated identifier. Built from a fresh UUID on creation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<Uuid>;

    /// The natural key used to make creation idempotent.
    type Key: Eq + Hash + Clone + Send + Sync + Debug;

    /// The data required to find or create an instance.
    type Create: Send + Sync + Debug;

    /// Resource-specific mutations (e.g. `Post`, `MarkRead`).
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// Read-only questions asked across every entity the actor owns.
    type Query: Send + Sync + Debug;

    /// The answer to a `Query`.
    type QueryResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// One error enum per actor. It travels back to the caller unboxed inside
    /// [`FrameworkError::Entity`](crate::FrameworkError::Entity).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Derives the natural key from a creation payload.
    fn key_for(params: &Self::Create) -> Self::Key;

    /// Construct the full entity from the generated ID and the payload.
    /// Called synchronously before `on_create`, and only when the key is new.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the entity is stored.
    /// An error here aborts creation and nothing is indexed.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Answer a read-only query over every stored entity.
    fn handle_query<'a, I>(entities: I, query: Self::Query) -> Result<Self::QueryResult, Self::Error>
    where
        I: Iterator<Item = &'a Self>;
}
