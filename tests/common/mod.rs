//! Shared fixtures: a seeded user directory, collaborators that fail on cue, and a harness
//! running the coordinator against a recording publisher.
#![allow(dead_code)]

use async_trait::async_trait;
use service_relay::clients::{CoordinatorClient, NotificationClient};
use service_relay::collaborators::{InMemoryOrders, InMemoryProfiles, OrderRepository, ProfileStats};
use service_relay::context::{CallerContext, Role};
use service_relay::coordinator::CoordinatorContext;
use service_relay::error::RelayError;
use service_relay::model::{Order, OrderDraft, OrderId, UserId, UserProfile};
use service_relay::room::RecordingPublisher;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub fn users() -> Vec<UserProfile> {
    vec![
        UserProfile::new("alice", "Alice", Role::Requester),
        UserProfile::new("dave", "Dave", Role::Requester),
        UserProfile::new("bob", "Bob", Role::Provider),
        UserProfile::new("carol", "Carol", Role::Provider),
        UserProfile::new("ops", "Ops", Role::Operator),
    ]
}

pub fn alice() -> CallerContext {
    CallerContext::requester("alice")
}

pub fn dave() -> CallerContext {
    CallerContext::requester("dave")
}

pub fn bob() -> CallerContext {
    CallerContext::provider("bob")
}

pub fn carol() -> CallerContext {
    CallerContext::provider("carol")
}

pub fn ops() -> CallerContext {
    CallerContext::operator("ops")
}

pub fn grooming() -> OrderDraft {
    OrderDraft {
        services: vec!["bath".into(), "haircut".into()],
        price: 45.0,
    }
}

/// In-memory orders whose next `n` saves fail with `Unavailable`.
#[derive(Default)]
pub struct FlakyOrders {
    inner: InMemoryOrders,
    failing_saves: AtomicU32,
    save_calls: AtomicU32,
}

impl FlakyOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_saves(&self, n: u32) {
        self.failing_saves.store(n, Ordering::SeqCst);
    }

    pub fn save_calls(&self) -> u32 {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub async fn stored(&self, id: &OrderId) -> Option<Order> {
        self.inner.get_order(id).await.unwrap()
    }
}

#[async_trait]
impl OrderRepository for FlakyOrders {
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RelayError> {
        self.inner.get_order(id).await
    }

    async fn save_order(&self, order: &Order) -> Result<(), RelayError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_saves.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_saves.store(remaining - 1, Ordering::SeqCst);
            return Err(RelayError::Unavailable("order store timed out".into()));
        }
        self.inner.save_order(order).await
    }
}

/// Profile statistics that are always down.
pub struct DownProfiles;

#[async_trait]
impl ProfileStats for DownProfiles {
    async fn record_completed_job(&self, _provider: &UserId) -> Result<(), RelayError> {
        Err(RelayError::Unavailable("profile service down".into()))
    }

    async fn revert_completed_job(&self, _provider: &UserId) -> Result<(), RelayError> {
        Err(RelayError::Unavailable("profile service down".into()))
    }
}

/// A running coordinator plus a real notification actor, publishing into a recorder.
pub struct Harness {
    pub coordinator: CoordinatorClient,
    pub notifications: NotificationClient,
    pub publisher: Arc<RecordingPublisher>,
    pub orders: Arc<FlakyOrders>,
    handles: Vec<JoinHandle<()>>,
}

impl Harness {
    pub fn start() -> (Self, Arc<InMemoryProfiles>) {
        let profiles = Arc::new(InMemoryProfiles::new());
        let harness = Self::with_profiles(profiles.clone());
        (harness, profiles)
    }

    pub fn with_profiles(profiles: Arc<dyn ProfileStats>) -> Self {
        let (notification_actor, notifications) = service_relay::notification_actor::new(16, 100);
        let notification_handle = tokio::spawn(notification_actor.run(()));
        let mut harness = Self::with_notifications(profiles, notifications);
        harness.handles.push(notification_handle);
        harness
    }

    /// Uses the given notification client as is; nothing is spawned for it.
    pub fn with_notifications(
        profiles: Arc<dyn ProfileStats>,
        notifications: NotificationClient,
    ) -> Self {
        let publisher = Arc::new(RecordingPublisher::new());
        let orders = Arc::new(FlakyOrders::new());
        let (actor, coordinator) = service_relay::coordinator::new(16);
        let handle = tokio::spawn(actor.run(CoordinatorContext {
            orders: orders.clone(),
            profiles,
            notifications: notifications.clone(),
            publisher: publisher.clone(),
        }));
        Self {
            coordinator,
            notifications,
            publisher,
            orders,
            handles: vec![handle],
        }
    }

    pub async fn stop(self) {
        drop(self.coordinator);
        drop(self.notifications);
        for handle in self.handles {
            handle.await.unwrap();
        }
    }
}
