//! Error types shared by every relay component.

use crate::model::OrderStatus;
use actor_framework::FrameworkError;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

/// Everything a relay operation can fail with.
///
/// The first four are domain outcomes returned to the caller as-is. `Unavailable` means a
/// collaborator or an actor mailbox could not be reached.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RelayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {action} an order that is {from}")]
    InvalidTransition {
        from: OrderStatus,
        action: &'static str,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl RelayError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Only `Unavailable` is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<FrameworkError<RelayError>> for RelayError {
    fn from(e: FrameworkError<RelayError>) -> Self {
        match e {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => RelayError::NotFound(id),
            transport => RelayError::Unavailable(transport.to_string()),
        }
    }
}

/// Runs `operation`, and runs it a second time if the first attempt was `Unavailable`.
///
/// Only for idempotent calls: reads, and upserts keyed by id.
pub async fn retry_once<T, F, Fut>(label: &'static str, mut operation: F) -> Result<T, RelayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RelayError>>,
{
    match operation().await {
        Err(e) if e.is_transient() => {
            warn!(operation = label, error = %e, "Retrying once");
            operation().await
        }
        other => other,
    }
}
