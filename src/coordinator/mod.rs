//! # Order Coordinator
//!
//! The single place that decides what happens when an order changes state.
//!
//! ```text
//! pending ──accept──▶ accepted ──start──▶ in_progress ──complete──▶ completed
//!    │                   │  └────────────complete─────────────────────▲
//!    └──────cancel───────┴──────▶ cancelled
//! ```
//!
//! Each request is checked against [`transitions`] before anything happens. A rejected request
//! saves nothing and publishes nothing. An accepted one applies its effects all together or
//! not at all, in a fixed order:
//!
//! 1. append notifications (retried once; drafts carry their id, so a retry stores one entry),
//! 2. credit the provider's job counters (completion only),
//! 3. save the order (retried once),
//! 4. publish live events, each appended notification included.
//!
//! When a step fails, the steps before it are undone (notifications deleted, the credit
//! reverted) and the request returns `Unavailable`. The order record is written last, so it
//! never holds a state whose side effects were lost.
//!
//! The order repository and profile statistics are external collaborators. The notification
//! log and the room registry are reached through their usual client and [`Publisher`](crate::room::Publisher).

mod actor;
mod message;
pub mod transitions;

pub use actor::{CoordinatorActor, CoordinatorContext};
pub use message::CoordinatorRequest;
pub use transitions::Transition;

use crate::clients::CoordinatorClient;

/// Creates the coordinator and its client. Wire it with `actor.run(context)`.
pub fn new(mailbox_capacity: usize) -> (CoordinatorActor, CoordinatorClient) {
    CoordinatorActor::new(mailbox_capacity)
}
