//! Demo: wires the relay with in-memory collaborators and plays one order from placement to
//! completion while a requester session and a provider session watch.
//!
//! ```bash
//! RUST_LOG=info cargo run -- [config.toml]
//! ```

use anyhow::Result;
use service_relay::collaborators::Collaborators;
use service_relay::config::RelayConfig;
use service_relay::context::{CallerContext, Role};
use service_relay::lifecycle::{setup_tracing, RelaySystem};
use service_relay::location_actor::distance_km;
use service_relay::model::{Coordinates, FixReport, MessageDraft, OrderDraft, UserProfile};
use std::path::PathBuf;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = RelayConfig::load(config_path.as_deref())?;
    info!(?config, "Configuration loaded");

    let collaborators = Collaborators::in_memory([
        UserProfile::new("alice", "Alice", Role::Requester),
        UserProfile::new("bob", "Bob", Role::Provider),
    ]);
    let system = RelaySystem::new(&config, collaborators);

    let alice = CallerContext::requester("alice");
    let bob = CallerContext::provider("bob");

    let mut alice_session = system.open_session(alice.clone());
    alice_session
        .handle_frame(r#"{"type":"join","user_id":"alice"}"#)
        .await?;
    let mut bob_session = system.open_session(bob.clone());
    bob_session
        .handle_frame(r#"{"type":"join","user_id":"bob"}"#)
        .await?;

    let order = async {
        let order = system
            .coordinator
            .create(
                &alice,
                OrderDraft {
                    services: vec!["full groom".into(), "nail trim".into()],
                    price: 65.0,
                },
            )
            .await?;
        system.coordinator.accept(&bob, order.id.clone()).await?;
        anyhow::Ok(order)
    }
    .instrument(tracing::info_span!("order_placement"))
    .await?;

    alice_session
        .handle_frame(&format!(
            r#"{{"type":"watch_order","order_id":"{}"}}"#,
            order.id
        ))
        .await?;

    let conversation = system
        .conversations
        .open(&alice, bob.user_id.clone(), Some(order.id.clone()))
        .await?;
    system
        .conversations
        .post(&bob, conversation.id, MessageDraft::text("On my way!"))
        .await?;

    let start = Coordinates::new(48.8566, 2.3522);
    let destination = Coordinates::new(48.8606, 2.3376);
    system
        .locations
        .record(&bob, FixReport::tracking(order.id.clone(), start))
        .await?;
    info!(
        remaining_km = distance_km(start, destination),
        "Provider en route"
    );

    system.coordinator.start(&bob, order.id.clone()).await?;
    let completed = system.coordinator.complete(&bob, order.id.clone()).await?;
    info!(order = %completed.id, status = %completed.status, "Order finished");

    while let Some(event) = alice_session.try_next_event() {
        info!(frame = %event.to_frame()?, "alice <-");
    }
    while let Some(event) = bob_session.try_next_event() {
        info!(frame = %event.to_frame()?, "bob <-");
    }

    let inbox = system.notifications.list(&alice.user_id, true).await?;
    info!(unread = inbox.unread_count, "Alice's notifications");
    let totals = system.notifications.totals().await?;
    info!(inboxes = totals.inboxes, stored = totals.notifications, "Notification log");

    drop(alice_session);
    drop(bob_session);
    system.shutdown().await?;

    info!("Demo completed");
    Ok(())
}
