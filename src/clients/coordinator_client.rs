//! # Coordinator Client
//!
//! Request/response handle to the order coordinator. Transport failures surface as
//! `Unavailable`, the same as for the store clients.
use crate::context::CallerContext;
use crate::coordinator::{CoordinatorRequest, Transition};
use crate::error::RelayError;
use crate::model::{Order, OrderDraft, OrderId, Review};
use actor_framework::FrameworkError;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

#[derive(Clone)]
pub struct CoordinatorClient {
    sender: mpsc::Sender<CoordinatorRequest>,
}

impl CoordinatorClient {
    pub fn new(sender: mpsc::Sender<CoordinatorRequest>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, RelayError>>) -> CoordinatorRequest,
    ) -> Result<R, RelayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RelayError::from(FrameworkError::<RelayError>::ActorClosed))?;
        response
            .await
            .map_err(|_| RelayError::from(FrameworkError::<RelayError>::ActorDropped))?
    }

    #[instrument(skip(self, caller, draft), fields(caller = %caller.user_id))]
    pub async fn create(&self, caller: &CallerContext, draft: OrderDraft) -> Result<Order, RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::Create {
            caller,
            draft,
            respond_to,
        })
        .await
    }

    async fn transition(
        &self,
        caller: &CallerContext,
        order_id: OrderId,
        transition: Transition,
    ) -> Result<Order, RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::Transition {
            caller,
            order_id,
            transition,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn accept(&self, caller: &CallerContext, order_id: OrderId) -> Result<Order, RelayError> {
        self.transition(caller, order_id, Transition::Accept).await
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn start(&self, caller: &CallerContext, order_id: OrderId) -> Result<Order, RelayError> {
        self.transition(caller, order_id, Transition::Start).await
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn complete(&self, caller: &CallerContext, order_id: OrderId) -> Result<Order, RelayError> {
        self.transition(caller, order_id, Transition::Complete).await
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn cancel(&self, caller: &CallerContext, order_id: OrderId) -> Result<Order, RelayError> {
        self.transition(caller, order_id, Transition::Cancel).await
    }

    /// Re-broadcasts a pending order to providers as `order_available`.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn announce(&self, caller: &CallerContext, order_id: OrderId) -> Result<(), RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::Announce {
            caller,
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn record_payment(
        &self,
        caller: &CallerContext,
        order_id: OrderId,
        amount: f64,
    ) -> Result<Order, RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::RecordPayment {
            caller,
            order_id,
            amount,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, caller, review), fields(caller = %caller.user_id, rating = review.rating))]
    pub async fn review(
        &self,
        caller: &CallerContext,
        order_id: OrderId,
        review: Review,
    ) -> Result<Order, RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::Review {
            caller,
            order_id,
            review,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn get_order(&self, caller: &CallerContext, order_id: OrderId) -> Result<Order, RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::Get {
            caller,
            order_id,
            respond_to,
        })
        .await
    }

    /// `Ok` when the caller may follow the order's live topic: the requester, the assigned
    /// provider or an operator.
    #[instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn authorize_watch(
        &self,
        caller: &CallerContext,
        order_id: OrderId,
    ) -> Result<(), RelayError> {
        let caller = caller.clone();
        self.request(|respond_to| CoordinatorRequest::AuthorizeWatch {
            caller,
            order_id,
            respond_to,
        })
        .await
    }
}
