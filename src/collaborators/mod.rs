//! External collaborators.
//!
//! Identity, order records and provider statistics are owned by other services. The relay
//! only sees these traits; the `memory` module holds in-process implementations used by the
//! demo binary and the tests.

mod memory;

pub use memory::{InMemoryOrders, InMemoryProfiles, InMemoryUsers, JobCounters};

use crate::error::RelayError;
use crate::model::{Order, OrderId, UserId, UserProfile};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, RelayError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RelayError>;

    /// Upsert by id.
    async fn save_order(&self, order: &Order) -> Result<(), RelayError>;
}

#[async_trait]
pub trait ProfileStats: Send + Sync {
    /// Bumps both the completed-job and the total-job counter of a provider.
    async fn record_completed_job(&self, provider: &UserId) -> Result<(), RelayError>;

    /// Takes back one `record_completed_job` whose order could not be saved.
    async fn revert_completed_job(&self, provider: &UserId) -> Result<(), RelayError>;
}

/// The collaborator set handed to [`RelaySystem`](crate::lifecycle::RelaySystem).
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserDirectory>,
    pub orders: Arc<dyn OrderRepository>,
    pub profiles: Arc<dyn ProfileStats>,
}

impl Collaborators {
    /// In-memory collaborators seeded with `users`.
    pub fn in_memory(users: impl IntoIterator<Item = UserProfile>) -> Self {
        Self {
            users: Arc::new(InMemoryUsers::with_users(users)),
            orders: Arc::new(InMemoryOrders::new()),
            profiles: Arc::new(InMemoryProfiles::new()),
        }
    }
}
