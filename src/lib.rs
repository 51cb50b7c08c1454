//! # Service Relay
//!
//! > **The real-time coordination core of a two-sided service marketplace.**
//!
//! Requesters place orders, providers accept and fulfil them, and both sides talk and follow
//! each other live while an order is in flight. This crate holds the stateful middle of that
//! flow; identity, order records and provider statistics stay with external collaborators.
//!
//! ## 🏗️ Components
//!
//! | Component | Module | Owns |
//! |-----------|--------|------|
//! | Room registry | [`room`] | topic subscriptions of live connections, event fan-out |
//! | Conversation store | [`conversation_actor`] | conversations, messages, unread counters |
//! | Location stream | [`location_actor`] | per-user fix history, `order:<id>` live feed |
//! | Notification log | [`notification_actor`] | bounded per-user inbox |
//! | Order coordinator | [`coordinator`] | order state machine and its side effects |
//!
//! The three stores are [`ResourceActor`](actor_framework::ResourceActor)s from the
//! `actor-framework` workspace crate: one task each, one request at a time, so every entity
//! has a single mutation point. The coordinator is its own sequential actor and the only
//! component that reaches across the others.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Explicit caller context
//! Every operation takes a [`CallerContext`](context::CallerContext). Authorization is
//! decided from it, never from ids inside a request body.
//!
//! ### 2. Injected publisher
//! Producers publish through the [`Publisher`](room::Publisher) trait. Tests substitute
//! [`RecordingPublisher`](room::RecordingPublisher) or [`NoopPublisher`](room::NoopPublisher).
//!
//! ### 3. Late-bound dependencies
//! Actors are created bare and receive their collaborators in `run(context)`; see
//! [`lifecycle`].
//!
//! ### 4. Errors
//! All components return [`RelayError`](error::RelayError). Domain outcomes pass through
//! unchanged; collaborator and transport failures become `Unavailable`.
//!
//! ## 🗺️ Module Tour
//!
//! - [`clients`]: typed handles over each actor.
//! - [`session`]: the live connection protocol (`join`, `watch_order`, `unwatch_order`).
//! - [`collaborators`]: traits for the external services plus in-memory versions.
//! - [`config`]: layered [`RelayConfig`](config::RelayConfig).
//! - [`model`]: plain data.
//!
//! ## 🚀 Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod conversation_actor;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod location_actor;
pub mod model;
pub mod notification_actor;
pub mod room;
pub mod session;
