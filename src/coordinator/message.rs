use super::transitions::Transition;
use crate::context::CallerContext;
use crate::error::RelayError;
use crate::model::{Order, OrderDraft, OrderId, Review};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, RelayError>>;

/// Messages accepted by the [`CoordinatorActor`](super::CoordinatorActor).
#[derive(Debug)]
pub enum CoordinatorRequest {
    Create {
        caller: CallerContext,
        draft: OrderDraft,
        respond_to: Reply<Order>,
    },
    Transition {
        caller: CallerContext,
        order_id: OrderId,
        transition: Transition,
        respond_to: Reply<Order>,
    },
    Announce {
        caller: CallerContext,
        order_id: OrderId,
        respond_to: Reply<()>,
    },
    RecordPayment {
        caller: CallerContext,
        order_id: OrderId,
        amount: f64,
        respond_to: Reply<Order>,
    },
    Review {
        caller: CallerContext,
        order_id: OrderId,
        review: Review,
        respond_to: Reply<Order>,
    },
    Get {
        caller: CallerContext,
        order_id: OrderId,
        respond_to: Reply<Order>,
    },
    AuthorizeWatch {
        caller: CallerContext,
        order_id: OrderId,
        respond_to: Reply<()>,
    },
}
