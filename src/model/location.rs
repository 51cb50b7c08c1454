//! Location fixes and per-user tracks.

use crate::model::{FixId, OrderId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// A provider moving towards or working on an order.
    Tracking,
    CustomerLocation,
    Delivery,
}

/// Optional sensor readings attached to a fix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixMeta {
    /// Metres.
    pub accuracy: Option<f64>,
    /// Metres per second.
    pub speed: Option<f64>,
    /// Degrees clockwise from north, `[0, 360)`.
    pub heading: Option<f64>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub id: FixId,
    pub user_id: UserId,
    pub order_id: Option<OrderId>,
    pub kind: FixKind,
    pub coordinates: Coordinates,
    #[serde(flatten)]
    pub meta: FixMeta,
    pub timestamp: DateTime<Utc>,
}

/// A report as submitted by a device. The reporting user comes from the caller context.
#[derive(Debug, Clone, PartialEq)]
pub struct FixReport {
    pub order_id: Option<OrderId>,
    pub kind: FixKind,
    pub coordinates: Coordinates,
    pub meta: FixMeta,
}

impl FixReport {
    pub fn tracking(order_id: OrderId, coordinates: Coordinates) -> Self {
        Self {
            order_id: Some(order_id),
            kind: FixKind::Tracking,
            coordinates,
            meta: FixMeta::default(),
        }
    }
}

/// History/latest filter. Time bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    pub order_id: Option<OrderId>,
    pub user_id: Option<UserId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl LocationFilter {
    pub fn for_order(order_id: OrderId) -> Self {
        Self {
            order_id: Some(order_id),
            ..Self::default()
        }
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, fix: &LocationFix) -> bool {
        if let Some(order_id) = &self.order_id {
            if fix.order_id.as_ref() != Some(order_id) {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if &fix.user_id != user_id {
                return false;
            }
        }
        if self.since.is_some_and(|since| fix.timestamp < since) {
            return false;
        }
        if self.until.is_some_and(|until| fix.timestamp > until) {
            return false;
        }
        true
    }
}

/// Every fix one user has reported, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationTrack {
    pub id: TrackId,
    pub user_id: UserId,
    pub fixes: Vec<LocationFix>,
}
