use super::{OrderRepository, ProfileStats, UserDirectory};
use crate::error::RelayError;
use crate::model::{Order, OrderId, UserId, UserProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: DashMap<UserId, UserProfile>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserProfile>) -> Self {
        let directory = Self::new();
        for user in users {
            directory.insert(user);
        }
        directory
    }

    pub fn insert(&self, user: UserProfile) {
        self.users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, RelayError> {
        Ok(self.users.get(id).map(|user| user.clone()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrders {
    orders: DashMap<OrderId, Order>,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RelayError> {
        Ok(self.orders.get(id).map(|order| order.clone()))
    }

    async fn save_order(&self, order: &Order) -> Result<(), RelayError> {
        self.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounters {
    pub completed_jobs: u32,
    pub total_jobs: u32,
}

#[derive(Debug, Default)]
pub struct InMemoryProfiles {
    counters: DashMap<UserId, JobCounters>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self, provider: &UserId) -> JobCounters {
        self.counters
            .get(provider)
            .map(|c| *c)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProfileStats for InMemoryProfiles {
    async fn record_completed_job(&self, provider: &UserId) -> Result<(), RelayError> {
        let mut counters = self.counters.entry(provider.clone()).or_default();
        counters.completed_jobs += 1;
        counters.total_jobs += 1;
        Ok(())
    }

    async fn revert_completed_job(&self, provider: &UserId) -> Result<(), RelayError> {
        if let Some(mut counters) = self.counters.get_mut(provider) {
            counters.completed_jobs = counters.completed_jobs.saturating_sub(1);
            counters.total_jobs = counters.total_jobs.saturating_sub(1);
        }
        Ok(())
    }
}
