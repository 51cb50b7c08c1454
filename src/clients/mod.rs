//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient) and the
//! coordinator mailbox.

pub mod conversation_client;
pub mod coordinator_client;
pub mod location_client;
pub mod notification_client;

pub use conversation_client::*;
pub use coordinator_client::*;
pub use location_client::*;
pub use notification_client::*;
