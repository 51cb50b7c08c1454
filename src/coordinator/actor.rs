use super::message::CoordinatorRequest;
use super::transitions::{self, Transition};
use crate::clients::{CoordinatorClient, NotificationClient};
use crate::collaborators::{OrderRepository, ProfileStats};
use crate::context::{CallerContext, Role};
use crate::error::{retry_once, RelayError};
use crate::model::{
    LiveEvent, Notification, NotificationDraft, NotificationKind, Order, OrderDraft, OrderId,
    Review, UserId,
};
use crate::room::{Publisher, Topic};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Dependencies of the coordinator, injected at `run` time.
#[derive(Clone)]
pub struct CoordinatorContext {
    pub orders: Arc<dyn OrderRepository>,
    pub profiles: Arc<dyn ProfileStats>,
    pub notifications: NotificationClient,
    pub publisher: Arc<dyn Publisher>,
}

/// Owns the order state machine. One task, one request at a time: two providers racing to
/// accept the same order are handled one after the other, and the second sees `accepted`.
pub struct CoordinatorActor {
    receiver: mpsc::Receiver<CoordinatorRequest>,
}

impl CoordinatorActor {
    pub fn new(buffer_size: usize) -> (Self, CoordinatorClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver }, CoordinatorClient::new(sender))
    }

    /// Runs until every [`CoordinatorClient`] has been dropped.
    pub async fn run(mut self, ctx: CoordinatorContext) {
        info!("Coordinator started");
        let mut handled = 0usize;

        while let Some(request) = self.receiver.recv().await {
            handled += 1;
            match request {
                CoordinatorRequest::Create {
                    caller,
                    draft,
                    respond_to,
                } => {
                    let result = ctx.create(caller, draft).await;
                    log_outcome("create", &result);
                    let _ = respond_to.send(result);
                }
                CoordinatorRequest::Transition {
                    caller,
                    order_id,
                    transition,
                    respond_to,
                } => {
                    let result = ctx.transition(caller, order_id, transition).await;
                    log_outcome(transition.verb(), &result);
                    let _ = respond_to.send(result);
                }
                CoordinatorRequest::Announce {
                    caller,
                    order_id,
                    respond_to,
                } => {
                    let result = ctx.announce(caller, order_id).await;
                    log_outcome("announce", &result);
                    let _ = respond_to.send(result);
                }
                CoordinatorRequest::RecordPayment {
                    caller,
                    order_id,
                    amount,
                    respond_to,
                } => {
                    let result = ctx.record_payment(caller, order_id, amount).await;
                    log_outcome("record_payment", &result);
                    let _ = respond_to.send(result);
                }
                CoordinatorRequest::Review {
                    caller,
                    order_id,
                    review,
                    respond_to,
                } => {
                    let result = ctx.review(caller, order_id, review).await;
                    log_outcome("review", &result);
                    let _ = respond_to.send(result);
                }
                CoordinatorRequest::Get {
                    caller,
                    order_id,
                    respond_to,
                } => {
                    let result = ctx.get(caller, order_id).await;
                    let _ = respond_to.send(result);
                }
                CoordinatorRequest::AuthorizeWatch {
                    caller,
                    order_id,
                    respond_to,
                } => {
                    let result = ctx.authorize_watch(caller, order_id).await;
                    log_outcome("authorize_watch", &result);
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(handled, "Coordinator shutdown");
    }
}

fn log_outcome<T>(operation: &'static str, result: &Result<T, RelayError>) {
    match result {
        Ok(_) => {}
        Err(e) if e.is_transient() => warn!(operation, error = %e, "Order operation failed"),
        Err(e) => debug!(operation, error = %e, "Order operation rejected"),
    }
}

/// Effects of one request. Nothing here touches a store until [`CoordinatorContext::commit`].
#[derive(Default)]
struct Outbox {
    notifications: Vec<(UserId, NotificationDraft)>,
    credit: Option<UserId>,
    events: Vec<(Topic, LiveEvent)>,
}

impl Outbox {
    fn notify(&mut self, user: &UserId, draft: NotificationDraft) {
        self.notifications.push((user.clone(), draft));
    }

    fn credit(&mut self, provider: &UserId) {
        self.credit = Some(provider.clone());
    }

    fn publish(&mut self, topic: Topic, event: LiveEvent) {
        self.events.push((topic, event));
    }
}

impl CoordinatorContext {
    async fn load(&self, order_id: &OrderId) -> Result<Order, RelayError> {
        retry_once("get_order", || self.orders.get_order(order_id))
            .await?
            .ok_or_else(|| RelayError::not_found(order_id))
    }

    async fn save(&self, order: &Order) -> Result<(), RelayError> {
        retry_once("save_order", || self.orders.save_order(order)).await
    }

    /// Writes `order` together with the outbox's notifications and credit, or none of them.
    ///
    /// The order is written last. Appends go first (retried once; a draft keeps its id, so a
    /// retry cannot duplicate it), then the credit, then the save. A failure undoes the steps
    /// already taken and the stored order keeps its previous state. Live events are published
    /// only after the save.
    async fn commit(&self, order: &Order, outbox: Outbox) -> Result<(), RelayError> {
        let mut appended = Vec::with_capacity(outbox.notifications.len());
        for (user, draft) in &outbox.notifications {
            let result = retry_once("append_notification", || {
                self.notifications.append(user, draft.clone())
            })
            .await;
            match result {
                Ok(notification) => appended.push(notification),
                Err(e) => {
                    error!(order = %order.id, user = %user, error = %e, "Notification append failed");
                    self.undo(&appended, None).await;
                    return Err(RelayError::Unavailable(format!(
                        "notification log unavailable: {e}"
                    )));
                }
            }
        }

        if let Some(provider) = &outbox.credit {
            if let Err(e) = self.profiles.record_completed_job(provider).await {
                error!(order = %order.id, provider = %provider, error = %e, "Crediting provider failed");
                self.undo(&appended, None).await;
                return Err(RelayError::Unavailable(format!(
                    "provider statistics unavailable: {e}"
                )));
            }
        }

        if let Err(e) = self.save(order).await {
            error!(order = %order.id, error = %e, "Saving order failed");
            self.undo(&appended, outbox.credit.as_ref()).await;
            return Err(e);
        }

        let pushed = appended
            .into_iter()
            .map(|n| (Topic::User(n.user_id.clone()), LiveEvent::Notification(n)));
        self.publish(outbox.events.into_iter().chain(pushed));
        Ok(())
    }

    /// Compensates a partially applied commit. Failures are logged; there is nothing left to
    /// roll back to.
    async fn undo(&self, appended: &[Notification], credited: Option<&UserId>) {
        if let Some(provider) = credited {
            if let Err(e) = self.profiles.revert_completed_job(provider).await {
                error!(provider = %provider, error = %e, "Reverting provider credit failed");
            }
        }
        for notification in appended {
            let result = retry_once("delete_notification", || {
                self.notifications.delete(&notification.user_id, notification.id)
            })
            .await;
            match result {
                Ok(_) | Err(RelayError::NotFound(_)) => {}
                Err(e) => {
                    error!(id = %notification.id, error = %e, "Withdrawing notification failed")
                }
            }
        }
    }

    fn publish(&self, events: impl IntoIterator<Item = (Topic, LiveEvent)>) {
        for (topic, event) in events {
            let delivered = self.publisher.publish(&topic, &event);
            debug!(%topic, event = event.name(), delivered, "Published");
        }
    }

    async fn create(&self, caller: CallerContext, draft: OrderDraft) -> Result<Order, RelayError> {
        if caller.role != Role::Requester {
            return Err(RelayError::forbidden("only requesters can place orders"));
        }
        if draft.services.is_empty() {
            return Err(RelayError::validation("an order needs at least one service"));
        }
        if !draft.price.is_finite() || draft.price < 0.0 {
            return Err(RelayError::validation("price must be a non-negative number"));
        }

        let order = Order::new(OrderId::generate(), caller.user_id, draft);
        let mut outbox = Outbox::default();
        outbox.publish(Topic::Providers, LiveEvent::NewOrder((&order).into()));
        self.commit(&order, outbox).await?;
        info!(order = %order.id, requester = %order.requester_id, "Order created");
        Ok(order)
    }

    async fn transition(
        &self,
        caller: CallerContext,
        order_id: OrderId,
        transition: Transition,
    ) -> Result<Order, RelayError> {
        let previous = self.load(&order_id).await?;
        let next = transitions::check(&previous, &caller, transition)?;

        let mut order = previous.clone();
        order.status = next;
        if transition == Transition::Accept {
            order.provider_id = Some(caller.user_id.clone());
        }
        order.updated_at = Utc::now();

        let requester = order.requester_id.clone();
        let payload = json!({ "order_id": order.id });
        let status_event = LiveEvent::OrderStatus {
            order_id: order.id.clone(),
            status: order.status,
            provider_id: order.provider_id.clone(),
        };
        let mut outbox = Outbox::default();
        match transition {
            Transition::Accept => {
                outbox.notify(
                    &requester,
                    NotificationDraft::new(
                        NotificationKind::OrderAccepted,
                        "Order accepted",
                        "A provider has accepted your order",
                        payload,
                    ),
                );
                outbox.publish(
                    Topic::User(requester),
                    LiveEvent::OrderAccepted {
                        order_id: order.id.clone(),
                        provider_id: caller.user_id,
                    },
                );
            }
            Transition::Start => {
                outbox.publish(Topic::User(requester), status_event);
            }
            Transition::Complete => {
                if let Some(provider) = &order.provider_id {
                    outbox.credit(provider);
                }
                outbox.notify(
                    &requester,
                    NotificationDraft::new(
                        NotificationKind::OrderCompleted,
                        "Order completed",
                        "Your order has been completed",
                        payload,
                    ),
                );
                outbox.publish(Topic::User(requester), status_event);
            }
            Transition::Cancel => {
                outbox.notify(
                    &requester,
                    NotificationDraft::new(
                        NotificationKind::OrderCancelled,
                        "Order cancelled",
                        "Your order has been cancelled",
                        payload,
                    ),
                );
                if let Some(provider) = &order.provider_id {
                    outbox.publish(Topic::User(provider.clone()), status_event.clone());
                }
                outbox.publish(Topic::User(requester), status_event);
            }
        }

        self.commit(&order, outbox).await?;
        info!(order = %order.id, from = %previous.status, to = %order.status, "Order transitioned");
        Ok(order)
    }

    async fn announce(&self, caller: CallerContext, order_id: OrderId) -> Result<(), RelayError> {
        let order = self.load(&order_id).await?;
        transitions::check_announce(&order, &caller)?;

        self.publish([(Topic::Providers, LiveEvent::OrderAvailable((&order).into()))]);
        Ok(())
    }

    async fn record_payment(
        &self,
        caller: CallerContext,
        order_id: OrderId,
        amount: f64,
    ) -> Result<Order, RelayError> {
        let mut order = self.load(&order_id).await?;
        transitions::check_payment(&order, &caller, amount)?;

        order.paid = true;
        order.updated_at = Utc::now();

        let mut outbox = Outbox::default();
        if let Some(provider) = &order.provider_id {
            outbox.notify(
                provider,
                NotificationDraft::new(
                    NotificationKind::PaymentReceived,
                    "Payment received",
                    format!("You received a payment of {amount:.2}"),
                    json!({ "order_id": order.id, "amount": amount }),
                ),
            );
            outbox.publish(
                Topic::User(provider.clone()),
                LiveEvent::PaymentReceived {
                    order_id: order.id.clone(),
                    amount,
                },
            );
        }
        self.commit(&order, outbox).await?;
        info!(order = %order.id, amount, "Payment recorded");
        Ok(order)
    }

    async fn review(
        &self,
        caller: CallerContext,
        order_id: OrderId,
        review: Review,
    ) -> Result<Order, RelayError> {
        let mut order = self.load(&order_id).await?;
        transitions::check_review(&order, &caller, &review)?;

        let rating = review.rating;
        order.review = Some(review);
        order.updated_at = Utc::now();

        let mut outbox = Outbox::default();
        if let Some(provider) = &order.provider_id {
            outbox.notify(
                provider,
                NotificationDraft::new(
                    NotificationKind::NewReview,
                    "New review",
                    format!("You received a {rating}-star review"),
                    json!({ "order_id": order.id, "rating": rating }),
                ),
            );
        }
        self.commit(&order, outbox).await?;
        Ok(order)
    }

    async fn get(&self, caller: CallerContext, order_id: OrderId) -> Result<Order, RelayError> {
        let order = self.load(&order_id).await?;
        transitions::check_visible(&order, &caller)?;
        Ok(order)
    }

    async fn authorize_watch(&self, caller: CallerContext, order_id: OrderId) -> Result<(), RelayError> {
        let order = self.load(&order_id).await?;
        transitions::check_watch(&order, &caller)
    }
}
