//! # Framework Errors
//!
//! Transport failures (the actor is gone) are kept apart from domain failures (the entity
//! said no), so callers can retry the first kind and surface the second.

/// Errors returned by a [`ResourceClient`](crate::ResourceClient).
///
/// `E` is the entity's own error type and is carried through unboxed.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError<E> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Entity(E),
}

impl<E> FrameworkError<E> {
    /// True when the actor could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ActorClosed | Self::ActorDropped)
    }
}
