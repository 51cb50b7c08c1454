mod common;

use chrono::Duration;
use common::*;
use service_relay::clients::LocationClient;
use service_relay::config::LocationConfig;
use service_relay::error::RelayError;
use service_relay::location_actor::LocationContext;
use service_relay::model::{
    Coordinates, FixKind, FixMeta, FixReport, LiveEvent, LocationFilter, OrderId, UserId,
};
use service_relay::room::{Publisher, RoomRegistry, Topic};
use std::sync::Arc;
use tokio::task::JoinHandle;

fn spawn_stream(registry: Arc<RoomRegistry>) -> (LocationClient, JoinHandle<()>) {
    let (actor, client) = service_relay::location_actor::new(16, LocationConfig::default());
    let handle = tokio::spawn(actor.run(LocationContext {
        publisher: registry,
    }));
    (client, handle)
}

fn standing(order: Option<&str>) -> FixReport {
    FixReport {
        order_id: order.map(OrderId::new),
        kind: FixKind::CustomerLocation,
        coordinates: Coordinates::new(40.4168, -3.7038),
        meta: FixMeta::default(),
    }
}

#[tokio::test]
async fn test_order_fix_reaches_each_watcher_once() {
    let registry = Arc::new(RoomRegistry::new());
    let (client, handle) = spawn_stream(registry.clone());
    let order = OrderId::new("ord_1");

    // Nobody watching yet: recorded, delivered to no one.
    client
        .record(&bob(), FixReport::tracking(order.clone(), Coordinates::new(1.0, 1.0)))
        .await
        .unwrap();

    let (first, mut first_rx) = registry.connect();
    let (second, mut second_rx) = registry.connect();
    let (_bystander, mut bystander_rx) = registry.connect();
    registry.join(first, Topic::Order(order.clone())).unwrap();
    registry.join(second, Topic::Order(order.clone())).unwrap();

    let coordinates = Coordinates::new(52.52, 13.405);
    let fix = client
        .record(&bob(), FixReport::tracking(order.clone(), coordinates))
        .await
        .unwrap();

    for rx in [&mut first_rx, &mut second_rx] {
        assert_eq!(
            rx.try_recv().unwrap(),
            LiveEvent::LocationUpdate {
                user_id: UserId::new("bob"),
                order_id: order.clone(),
                coordinates,
                timestamp: fix.timestamp,
            }
        );
        assert!(rx.try_recv().is_err());
    }
    assert!(bystander_rx.try_recv().is_err());

    // Fixes outside an order are never pushed.
    client.record(&alice(), standing(None)).await.unwrap();
    assert!(first_rx.try_recv().is_err());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_invalid_fixes_are_rejected() {
    let registry = Arc::new(RoomRegistry::new());
    let (client, handle) = spawn_stream(registry);

    let mut off_planet = standing(None);
    off_planet.coordinates = Coordinates::new(0.0, 181.0);
    assert!(matches!(
        client.record(&alice(), off_planet).await,
        Err(RelayError::Validation(_))
    ));

    let mut bad_heading = standing(None);
    bad_heading.meta.heading = Some(400.0);
    assert!(matches!(
        client.record(&alice(), bad_heading).await,
        Err(RelayError::Validation(_))
    ));

    let history = client
        .history(LocationFilter::for_user(UserId::new("alice")), None)
        .await
        .unwrap();
    assert!(history.is_empty());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_history_filters_and_limits() {
    let registry = Arc::new(RoomRegistry::new());
    let (client, handle) = spawn_stream(registry);
    let order = OrderId::new("ord_7");

    let mut recorded = Vec::new();
    for step in 0..5 {
        let report = FixReport::tracking(
            order.clone(),
            Coordinates::new(10.0 + step as f64 * 0.01, 20.0),
        );
        recorded.push(client.record(&bob(), report).await.unwrap());
    }
    client.record(&bob(), standing(None)).await.unwrap();
    client.record(&alice(), standing(Some("ord_7"))).await.unwrap();

    let by_order = client
        .history(LocationFilter::for_order(order.clone()), None)
        .await
        .unwrap();
    assert_eq!(by_order.len(), 6);
    assert!(by_order.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let bob_on_order = client
        .history(
            LocationFilter {
                order_id: Some(order.clone()),
                user_id: Some(UserId::new("bob")),
                ..LocationFilter::default()
            },
            Some(2),
        )
        .await
        .unwrap();
    let ids: Vec<_> = bob_on_order.iter().map(|fix| fix.id).collect();
    assert_eq!(ids, vec![recorded[4].id, recorded[3].id]);

    // Both bounds are inclusive.
    let window = client
        .history(
            LocationFilter {
                user_id: Some(UserId::new("bob")),
                since: Some(recorded[1].timestamp),
                until: Some(recorded[3].timestamp),
                ..LocationFilter::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(window.len(), 3);

    let far_future = LocationFilter {
        since: Some(recorded[4].timestamp + Duration::days(1)),
        ..LocationFilter::default()
    };
    assert!(client.history(far_future, None).await.unwrap().is_empty());

    let latest = client
        .latest(LocationFilter::for_user(UserId::new("alice")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.user_id, UserId::new("alice"));
    assert!(client
        .latest(LocationFilter::for_user(UserId::new("nobody")))
        .await
        .unwrap()
        .is_none());

    drop(client);
    handle.await.unwrap();
}
