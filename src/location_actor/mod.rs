//! Location stream: per-user fix history and the live `location_update` feed for orders.

pub mod actions;
pub mod entity;
pub mod geo;

pub use actions::*;
pub use geo::distance_km;

use crate::clients::LocationClient;
use crate::config::LocationConfig;
use crate::model::LocationTrack;
use crate::room::Publisher;
use actor_framework::ResourceActor;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocationContext {
    pub publisher: Arc<dyn Publisher>,
}

/// Creates a new location actor and its client.
pub fn new(
    mailbox_capacity: usize,
    limits: LocationConfig,
) -> (ResourceActor<LocationTrack>, LocationClient) {
    let (actor, client) = ResourceActor::new(mailbox_capacity);
    (actor, LocationClient::new(client, limits))
}
