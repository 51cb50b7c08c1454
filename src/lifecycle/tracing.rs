//! # Tracing Setup
//!
//! Structured logging for the whole relay, configured through `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle, created entities, transitions
//! RUST_LOG=debug cargo run    # every request, rejection and publish
//! RUST_LOG=service_relay::room=debug cargo run
//! ```
//!
//! Fields carry the identifiers (`order`, `connection`, `topic`, `entity_type`), so lines
//! stay short:
//!
//! ```text
//! INFO Created entity_type="ConversationThread" id=conv_5f0c... size=1
//! INFO Order transitioned order=ord_91ab... from=pending to=accepted
//! DEBUG Published topic=user:alice event="order_accepted" delivered=1
//! ```
//!
//! Domain rejections (`Forbidden`, `InvalidTransition`, ...) log at `debug`; collaborator
//! outages at `warn`; a notification lost after a saved transition at `error`.

/// Installs the global subscriber. Call once, from the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type and topic fields say where a line comes from
        .compact()
        .init();
}
