//! Events pushed over live connections.
//!
//! Serialised adjacently tagged, so a frame on the wire reads
//! `{"event": "order_accepted", "data": {...}}`.

use crate::model::{
    Coordinates, Message, Notification, OrderAnnouncement, OrderId, OrderStatus, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum LiveEvent {
    NewMessage(Message),
    OrderAccepted {
        order_id: OrderId,
        provider_id: UserId,
    },
    OrderStatus {
        order_id: OrderId,
        status: OrderStatus,
        provider_id: Option<UserId>,
    },
    PaymentReceived {
        order_id: OrderId,
        amount: f64,
    },
    Notification(Notification),
    NewOrder(OrderAnnouncement),
    OrderAvailable(OrderAnnouncement),
    LocationUpdate {
        user_id: UserId,
        order_id: OrderId,
        coordinates: Coordinates,
        timestamp: DateTime<Utc>,
    },
}

impl LiveEvent {
    /// The wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            LiveEvent::NewMessage(_) => "new_message",
            LiveEvent::OrderAccepted { .. } => "order_accepted",
            LiveEvent::OrderStatus { .. } => "order_status",
            LiveEvent::PaymentReceived { .. } => "payment_received",
            LiveEvent::Notification(_) => "notification",
            LiveEvent::NewOrder(_) => "new_order",
            LiveEvent::OrderAvailable(_) => "order_available",
            LiveEvent::LocationUpdate { .. } => "location_update",
        }
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
