mod common;

use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use common::*;
use service_relay::clients::NotificationClient;
use service_relay::collaborators::InMemoryProfiles;
use service_relay::error::RelayError;
use service_relay::model::{
    Inbox, InboxId, LiveEvent, Notification, NotificationId, NotificationKind, OrderDraft, OrderId,
    OrderStatus, Review, UserId,
};
use service_relay::notification_actor::InboxActionResult;
use service_relay::room::Topic;
use std::collections::VecDeque;
use std::sync::Arc;

fn user_topic(id: &str) -> Topic {
    Topic::User(UserId::new(id))
}

async fn kinds_for(harness: &Harness, user: &str) -> Vec<NotificationKind> {
    harness
        .notifications
        .list(&UserId::new(user), false)
        .await
        .unwrap()
        .items
        .into_iter()
        .map(|n| n.kind)
        .collect()
}

#[tokio::test]
async fn test_order_lifecycle_effects() {
    let (harness, profiles) = Harness::start();

    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(harness.publisher.names_for(&Topic::Providers), vec!["new_order"]);

    let accepted = harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    assert_eq!(accepted.status, OrderStatus::Accepted);
    assert_eq!(accepted.provider_id, Some(UserId::new("bob")));
    assert_eq!(
        harness.publisher.names_for(&user_topic("alice")),
        vec!["order_accepted", "notification"]
    );
    assert_eq!(kinds_for(&harness, "alice").await, vec![NotificationKind::OrderAccepted]);

    harness.coordinator.start(&bob(), order.id.clone()).await.unwrap();
    let completed = harness.coordinator.complete(&bob(), order.id.clone()).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);

    let counters = profiles.counters(&UserId::new("bob"));
    assert_eq!((counters.completed_jobs, counters.total_jobs), (1, 1));
    assert_eq!(
        kinds_for(&harness, "alice").await,
        vec![NotificationKind::OrderCompleted, NotificationKind::OrderAccepted]
    );
    assert_eq!(
        harness.publisher.names_for(&user_topic("alice")),
        vec![
            "order_accepted",
            "notification",
            "order_status",
            "order_status",
            "notification"
        ]
    );

    // A second completion changes nothing.
    let events_before = harness.publisher.published().len();
    let again = harness.coordinator.complete(&bob(), order.id.clone()).await;
    assert_eq!(
        again,
        Err(RelayError::InvalidTransition {
            from: OrderStatus::Completed,
            action: "complete"
        })
    );
    assert_eq!(harness.publisher.published().len(), events_before);
    assert_eq!(profiles.counters(&UserId::new("bob")).completed_jobs, 1);

    let stored = harness.orders.stored(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);

    harness.stop().await;
}

#[tokio::test]
async fn test_second_accept_is_rejected_without_effects() {
    let (harness, _) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();

    harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    let events_before = harness.publisher.published().len();

    let second = harness.coordinator.accept(&carol(), order.id.clone()).await;
    assert_eq!(
        second,
        Err(RelayError::InvalidTransition {
            from: OrderStatus::Accepted,
            action: "accept"
        })
    );
    assert_eq!(harness.publisher.published().len(), events_before);
    assert_eq!(kinds_for(&harness, "alice").await.len(), 1);

    let stored = harness.orders.stored(&order.id).await.unwrap();
    assert_eq!(stored.provider_id, Some(UserId::new("bob")));

    harness.stop().await;
}

#[tokio::test]
async fn test_racing_accepts_have_one_winner() {
    let (harness, _) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();

    let (bob, carol) = (bob(), carol());
    let (bob_result, carol_result) = tokio::join!(
        harness.coordinator.accept(&bob, order.id.clone()),
        harness.coordinator.accept(&carol, order.id.clone())
    );
    assert_eq!(
        [bob_result.is_ok(), carol_result.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count(),
        1
    );
    assert_eq!(
        harness
            .publisher
            .names_for(&user_topic("alice"))
            .iter()
            .filter(|name| **name == "order_accepted")
            .count(),
        1
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_guard_failure_order() {
    let (harness, _) = Harness::start();

    let missing = harness
        .coordinator
        .accept(&alice(), OrderId::new("ord_missing"))
        .await;
    assert!(matches!(missing, Err(RelayError::NotFound(_))));

    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    // A requester trying to accept is a role problem, reported before any state problem.
    assert!(matches!(
        harness.coordinator.accept(&alice(), order.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));
    // Nobody is assigned yet, so nobody may start it.
    assert!(matches!(
        harness.coordinator.start(&bob(), order.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));

    harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    harness.coordinator.start(&bob(), order.id.clone()).await.unwrap();
    assert_eq!(
        harness.coordinator.start(&bob(), order.id.clone()).await,
        Err(RelayError::InvalidTransition {
            from: OrderStatus::InProgress,
            action: "start"
        })
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_only_requesters_create_valid_orders() {
    let (harness, _) = Harness::start();

    assert!(matches!(
        harness.coordinator.create(&bob(), grooming()).await,
        Err(RelayError::Forbidden(_))
    ));
    let empty = OrderDraft {
        services: vec![],
        price: 10.0,
    };
    assert!(matches!(
        harness.coordinator.create(&alice(), empty).await,
        Err(RelayError::Validation(_))
    ));
    assert!(harness.publisher.published().is_empty());

    harness.stop().await;
}

#[tokio::test]
async fn test_cancel_rules_and_effects() {
    let (harness, _) = Harness::start();

    let pending = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    assert!(matches!(
        harness.coordinator.cancel(&dave(), pending.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));
    let cancelled = harness.coordinator.cancel(&alice(), pending.id.clone()).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let accepted = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    harness.coordinator.accept(&bob(), accepted.id.clone()).await.unwrap();
    harness.publisher.clear();

    assert!(matches!(
        harness.coordinator.cancel(&alice(), accepted.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));
    assert!(harness.publisher.published().is_empty());

    harness.coordinator.cancel(&ops(), accepted.id.clone()).await.unwrap();
    assert_eq!(
        harness.publisher.names_for(&user_topic("alice")),
        vec!["order_status", "notification"]
    );
    assert_eq!(harness.publisher.names_for(&user_topic("bob")), vec!["order_status"]);
    assert_eq!(
        kinds_for(&harness, "alice").await,
        vec![
            NotificationKind::OrderCancelled,
            NotificationKind::OrderAccepted,
            NotificationKind::OrderCancelled
        ]
    );

    assert!(matches!(
        harness.coordinator.cancel(&ops(), accepted.id.clone()).await,
        Err(RelayError::InvalidTransition { .. })
    ));

    harness.stop().await;
}

#[tokio::test]
async fn test_save_retried_once_then_applied() {
    let (harness, _) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    let saves_before = harness.orders.save_calls();

    harness.orders.fail_next_saves(1);
    let accepted = harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();

    assert_eq!(accepted.status, OrderStatus::Accepted);
    assert_eq!(harness.orders.save_calls(), saves_before + 2);
    assert_eq!(kinds_for(&harness, "alice").await.len(), 1);
    assert_eq!(
        harness.publisher.names_for(&user_topic("alice")),
        vec!["order_accepted", "notification"]
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_save_failing_twice_leaves_no_trace() {
    let (harness, _) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    harness.publisher.clear();

    harness.orders.fail_next_saves(2);
    let result = harness.coordinator.accept(&bob(), order.id.clone()).await;

    assert!(matches!(result, Err(RelayError::Unavailable(_))));
    assert!(harness.publisher.published().is_empty());
    assert!(kinds_for(&harness, "alice").await.is_empty());
    let stored = harness.orders.stored(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.provider_id, None);

    // The outage is over; the order is still up for grabs.
    harness.coordinator.accept(&carol(), order.id.clone()).await.unwrap();

    harness.stop().await;
}

#[tokio::test]
async fn test_profile_outage_leaves_order_untouched() {
    let harness = Harness::with_profiles(Arc::new(DownProfiles));
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    harness.coordinator.start(&bob(), order.id.clone()).await.unwrap();
    harness.publisher.clear();
    let saves_before = harness.orders.save_calls();

    let result = harness.coordinator.complete(&bob(), order.id.clone()).await;
    assert!(matches!(result, Err(RelayError::Unavailable(_))));

    let stored = harness.orders.stored(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::InProgress);
    assert_eq!(harness.orders.save_calls(), saves_before);
    assert!(harness.publisher.published().is_empty());
    // The completion notice was appended first and withdrawn again.
    assert_eq!(
        kinds_for(&harness, "alice").await,
        vec![NotificationKind::OrderAccepted]
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_failed_save_after_credit_reverts_everything() {
    let (harness, profiles) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    harness.publisher.clear();

    harness.orders.fail_next_saves(2);
    let result = harness.coordinator.complete(&bob(), order.id.clone()).await;
    assert!(matches!(result, Err(RelayError::Unavailable(_))));

    assert_eq!(
        harness.orders.stored(&order.id).await.unwrap().status,
        OrderStatus::Accepted
    );
    assert_eq!(profiles.counters(&UserId::new("bob")).completed_jobs, 0);
    assert_eq!(profiles.counters(&UserId::new("bob")).total_jobs, 0);
    assert_eq!(
        kinds_for(&harness, "alice").await,
        vec![NotificationKind::OrderAccepted]
    );
    assert!(harness.publisher.published().is_empty());

    // Once the store is back, the same completion goes through exactly once.
    harness.coordinator.complete(&bob(), order.id.clone()).await.unwrap();
    assert_eq!(profiles.counters(&UserId::new("bob")).completed_jobs, 1);
    assert_eq!(
        kinds_for(&harness, "alice").await,
        vec![NotificationKind::OrderCompleted, NotificationKind::OrderAccepted]
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_unreachable_notification_log_fails_transition() {
    let mut inbox_mock = MockClient::<Inbox>::new();
    inbox_mock
        .expect_find_or_create()
        .return_err(FrameworkError::ActorClosed);
    inbox_mock
        .expect_find_or_create()
        .return_err(FrameworkError::ActorClosed);
    let notifications = NotificationClient::new(inbox_mock.client(), 100);
    let harness = Harness::with_notifications(Arc::new(InMemoryProfiles::new()), notifications);

    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    harness.publisher.clear();
    let result = harness.coordinator.accept(&bob(), order.id.clone()).await;

    assert!(matches!(result, Err(RelayError::Unavailable(_))));
    let stored = harness.orders.stored(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.provider_id, None);
    assert!(harness.publisher.published().is_empty());
    inbox_mock.verify();

    harness.stop().await;
}

#[tokio::test]
async fn test_notification_append_retried_once() {
    let alice_id = UserId::new("alice");
    let inbox = Inbox {
        id: InboxId::new(),
        user_id: alice_id.clone(),
        capacity: 100,
        entries: VecDeque::new(),
    };
    let stored = Notification {
        id: NotificationId::new(),
        user_id: alice_id,
        kind: NotificationKind::OrderAccepted,
        title: "Order accepted".into(),
        message: "A provider has accepted your order".into(),
        payload: serde_json::Value::Null,
        read: false,
        created_at: chrono::Utc::now(),
    };

    let mut inbox_mock = MockClient::<Inbox>::new();
    inbox_mock
        .expect_find_or_create()
        .return_err(FrameworkError::ActorClosed);
    inbox_mock.expect_find_or_create().return_ok(inbox.clone());
    inbox_mock
        .expect_action(inbox.id)
        .return_ok(InboxActionResult::Appended(stored.clone()));
    let notifications = NotificationClient::new(inbox_mock.client(), 100);
    let harness = Harness::with_notifications(Arc::new(InMemoryProfiles::new()), notifications);

    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();
    let accepted = harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();

    assert_eq!(accepted.status, OrderStatus::Accepted);
    assert_eq!(
        harness.publisher.events_for(&user_topic("alice")).last(),
        Some(&LiveEvent::Notification(stored))
    );
    inbox_mock.verify();

    harness.stop().await;
}

#[tokio::test]
async fn test_announce_payment_and_review() {
    let (harness, _) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();

    assert!(matches!(
        harness.coordinator.announce(&dave(), order.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));
    harness.coordinator.announce(&alice(), order.id.clone()).await.unwrap();
    assert_eq!(
        harness.publisher.names_for(&Topic::Providers),
        vec!["new_order", "order_available"]
    );

    harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    assert!(matches!(
        harness.coordinator.announce(&alice(), order.id.clone()).await,
        Err(RelayError::InvalidTransition { .. })
    ));

    assert!(matches!(
        harness.coordinator.record_payment(&alice(), order.id.clone(), 45.0).await,
        Err(RelayError::Forbidden(_))
    ));
    let paid = harness
        .coordinator
        .record_payment(&ops(), order.id.clone(), 45.0)
        .await
        .unwrap();
    assert!(paid.paid);
    assert_eq!(
        harness.publisher.events_for(&user_topic("bob"))[0],
        LiveEvent::PaymentReceived {
            order_id: order.id.clone(),
            amount: 45.0
        }
    );
    assert!(matches!(
        harness.coordinator.record_payment(&ops(), order.id.clone(), 45.0).await,
        Err(RelayError::Validation(_))
    ));

    let five_stars = Review {
        rating: 5,
        comment: Some("Spotless".into()),
    };
    assert!(matches!(
        harness.coordinator.review(&alice(), order.id.clone(), five_stars.clone()).await,
        Err(RelayError::InvalidTransition { .. })
    ));
    harness.coordinator.complete(&bob(), order.id.clone()).await.unwrap();
    let reviewed = harness
        .coordinator
        .review(&alice(), order.id.clone(), five_stars.clone())
        .await
        .unwrap();
    assert_eq!(reviewed.review, Some(five_stars.clone()));
    assert!(matches!(
        harness.coordinator.review(&alice(), order.id.clone(), five_stars).await,
        Err(RelayError::Validation(_))
    ));
    assert_eq!(
        kinds_for(&harness, "bob").await,
        vec![NotificationKind::NewReview, NotificationKind::PaymentReceived]
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_order_visibility() {
    let (harness, _) = Harness::start();
    let order = harness.coordinator.create(&alice(), grooming()).await.unwrap();

    assert!(harness.coordinator.get_order(&alice(), order.id.clone()).await.is_ok());
    assert!(harness.coordinator.get_order(&carol(), order.id.clone()).await.is_ok());
    assert!(matches!(
        harness.coordinator.get_order(&dave(), order.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));
    // Browsing a pending order is not the same as following it.
    assert!(matches!(
        harness.coordinator.authorize_watch(&carol(), order.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));
    assert!(harness.coordinator.authorize_watch(&alice(), order.id.clone()).await.is_ok());

    harness.coordinator.accept(&bob(), order.id.clone()).await.unwrap();
    assert!(harness.coordinator.authorize_watch(&bob(), order.id.clone()).await.is_ok());
    assert!(harness.coordinator.authorize_watch(&ops(), order.id.clone()).await.is_ok());
    assert!(matches!(
        harness.coordinator.authorize_watch(&carol(), order.id.clone()).await,
        Err(RelayError::Forbidden(_))
    ));

    harness.stop().await;
}
