//! # System Lifecycle
//!
//! Starts the store actors and the coordinator, wires them together through their run-time
//! contexts, and shuts them down again.
//!
//! Construction and wiring are separate steps. Each actor is created without dependencies,
//! then spawned with `run(context)`:
//!
//! ```rust,ignore
//! let (notification_actor, notifications) = notification_actor::new(cap, retention);
//! let (coordinator_actor, coordinator) = coordinator::new(cap);
//!
//! tokio::spawn(notification_actor.run(()));
//! tokio::spawn(coordinator_actor.run(CoordinatorContext {
//!     notifications: notifications.clone(),
//!     ..
//! }));
//! ```
//!
//! The dependency graph is acyclic (only the coordinator holds another actor's client), so
//! dropping every client is enough to stop every actor.
//!
//! [`setup_tracing`] installs the `tracing` subscriber used by the binary.

pub mod relay_system;
pub mod tracing;

pub use self::relay_system::*;
pub use self::tracing::*;
