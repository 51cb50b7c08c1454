//! Orders as the coordinator sees them.
//!
//! The order record itself lives in the external [`OrderRepository`](crate::collaborators::OrderRepository);
//! the relay only reads it, transitions its status and writes it back.

use crate::model::{OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// 1 to 5.
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub requester_id: UserId,
    pub provider_id: Option<UserId>,
    pub status: OrderStatus,
    pub services: Vec<String>,
    pub price: f64,
    pub paid: bool,
    pub review: Option<Review>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, requester_id: UserId, draft: OrderDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            requester_id,
            provider_id: None,
            status: OrderStatus::Pending,
            services: draft.services,
            price: draft.price,
            paid: false,
            review: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_provider(&self, user: &UserId) -> bool {
        self.provider_id.as_ref() == Some(user)
    }

    pub fn is_party(&self, user: &UserId) -> bool {
        &self.requester_id == user || self.is_provider(user)
    }
}

/// What a requester submits when placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub services: Vec<String>,
    pub price: f64,
}

/// The public summary broadcast to providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAnnouncement {
    pub order_id: OrderId,
    pub services: Vec<String>,
    pub price: f64,
}

impl From<&Order> for OrderAnnouncement {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            services: order.services.clone(),
            price: order.price,
        }
    }
}
