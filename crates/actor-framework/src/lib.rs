//! # Actor Framework
//!
//! Building blocks for resource actors: one Tokio task owns every entity of a type and
//! handles requests for them sequentially, while cloneable clients talk to it over channels.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): domain state plus its create/action/query hooks.
//! 2. **Runtime** ([`ResourceActor`]): the mailbox loop, the id store and the key index.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed request/response calls.
//!
//! ## Operations
//!
//! - `find_or_create` is idempotent on the entity's natural key.
//! - `get` reads one entity by id; `lookup` resolves a natural key to an id.
//! - `perform_action` mutates one entity; errors come back typed as
//!   [`FrameworkError::Entity`].
//! - `query` answers a read-only question across all entities.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//! use uuid::Uuid;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! struct CounterId(Uuid);
//! impl From<Uuid> for CounterId {
//!     fn from(id: Uuid) -> Self { Self(id) }
//! }
//! impl std::fmt::Display for CounterId {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
//! }
//!
//! #[derive(Clone, Debug)]
//! struct Counter { id: CounterId, name: String, value: u64 }
//!
//! #[derive(Debug)] struct CounterCreate { name: String }
//! #[derive(Debug)] enum CounterAction { Bump }
//! #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = CounterId;
//!     type Key = String;
//!     type Create = CounterCreate;
//!     type Action = CounterAction;
//!     type ActionResult = u64;
//!     type Query = ();
//!     type QueryResult = u64;
//!     type Context = ();
//!     type Error = CounterError;
//!
//!     fn key_for(params: &CounterCreate) -> String { params.name.clone() }
//!     fn from_create_params(id: CounterId, params: CounterCreate) -> Result<Self, CounterError> {
//!         Ok(Self { id, name: params.name, value: 0 })
//!     }
//!     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u64, CounterError> {
//!         self.value += 1;
//!         Ok(self.value)
//!     }
//!     fn handle_query<'a, I>(entities: I, _: ()) -> Result<u64, CounterError>
//!     where
//!         I: Iterator<Item = &'a Self>,
//!     {
//!         Ok(entities.map(|c| c.value).sum())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let first = client.find_or_create(CounterCreate { name: "hits".into() }).await.unwrap();
//!     let again = client.find_or_create(CounterCreate { name: "hits".into() }).await.unwrap();
//!     assert_eq!(first.id, again.id);
//!
//!     client.perform_action(first.id, CounterAction::Bump).await.unwrap();
//!     assert_eq!(client.query(()).await.unwrap(), 1);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are passed to `run(context)` rather than `new()`, so actors can be created
//! first and wired to each other's clients afterwards.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient` from scripted replies, for testing
//! the code around a client without running the actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
