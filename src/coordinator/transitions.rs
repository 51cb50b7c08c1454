//! Guards of the order state machine.
//!
//! Pure functions over an [`Order`] snapshot and the caller. They decide whether a request may
//! proceed and what the order looks like afterwards; they never perform effects.
//!
//! Checks run in a fixed order: relationship/role first (`Forbidden`), then state
//! (`InvalidTransition`), then input (`Validation`).

use crate::context::{CallerContext, Role};
use crate::error::RelayError;
use crate::model::{Order, OrderStatus, Review};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    Start,
    Complete,
    Cancel,
}

impl Transition {
    pub fn verb(self) -> &'static str {
        match self {
            Transition::Accept => "accept",
            Transition::Start => "start",
            Transition::Complete => "complete",
            Transition::Cancel => "cancel",
        }
    }
}

fn invalid(order: &Order, action: &'static str) -> RelayError {
    RelayError::InvalidTransition {
        from: order.status,
        action,
    }
}

/// Returns the status the order moves to.
pub fn check(
    order: &Order,
    caller: &CallerContext,
    transition: Transition,
) -> Result<OrderStatus, RelayError> {
    match transition {
        Transition::Accept => {
            if caller.role != Role::Provider {
                return Err(RelayError::forbidden("only providers can accept orders"));
            }
            if order.status != OrderStatus::Pending {
                return Err(invalid(order, transition.verb()));
            }
            Ok(OrderStatus::Accepted)
        }
        Transition::Start => {
            if !order.is_provider(&caller.user_id) {
                return Err(RelayError::forbidden(
                    "only the assigned provider can start this order",
                ));
            }
            if order.status != OrderStatus::Accepted {
                return Err(invalid(order, transition.verb()));
            }
            Ok(OrderStatus::InProgress)
        }
        Transition::Complete => {
            if !order.is_provider(&caller.user_id) {
                return Err(RelayError::forbidden(
                    "only the assigned provider can complete this order",
                ));
            }
            if order.status.is_terminal() {
                return Err(invalid(order, transition.verb()));
            }
            Ok(OrderStatus::Completed)
        }
        Transition::Cancel => {
            if caller.role != Role::Operator {
                if !caller.is(&order.requester_id) {
                    return Err(RelayError::forbidden(
                        "only the requester or an operator can cancel this order",
                    ));
                }
                if order.status == OrderStatus::Accepted {
                    return Err(RelayError::forbidden(
                        "an accepted order can only be cancelled by an operator",
                    ));
                }
            }
            if !matches!(order.status, OrderStatus::Pending | OrderStatus::Accepted) {
                return Err(invalid(order, transition.verb()));
            }
            Ok(OrderStatus::Cancelled)
        }
    }
}

pub fn check_announce(order: &Order, caller: &CallerContext) -> Result<(), RelayError> {
    if !caller.is(&order.requester_id) {
        return Err(RelayError::forbidden("only the requester can announce this order"));
    }
    if order.status != OrderStatus::Pending {
        return Err(invalid(order, "announce"));
    }
    Ok(())
}

pub fn check_payment(order: &Order, caller: &CallerContext, amount: f64) -> Result<(), RelayError> {
    if caller.role != Role::Operator {
        return Err(RelayError::forbidden("only operators can record payments"));
    }
    if order.status == OrderStatus::Cancelled {
        return Err(invalid(order, "record a payment for"));
    }
    if order.paid {
        return Err(RelayError::validation("payment already recorded"));
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(RelayError::validation("payment amount must be positive"));
    }
    Ok(())
}

pub fn check_review(order: &Order, caller: &CallerContext, review: &Review) -> Result<(), RelayError> {
    if !caller.is(&order.requester_id) {
        return Err(RelayError::forbidden("only the requester can review this order"));
    }
    if order.status != OrderStatus::Completed {
        return Err(invalid(order, "review"));
    }
    if order.review.is_some() {
        return Err(RelayError::validation("order already reviewed"));
    }
    if !(1..=5).contains(&review.rating) {
        return Err(RelayError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

/// Who may read an order.
pub fn check_visible(order: &Order, caller: &CallerContext) -> Result<(), RelayError> {
    let visible = caller.role == Role::Operator
        || order.is_party(&caller.user_id)
        || (caller.role == Role::Provider && order.status == OrderStatus::Pending);
    if visible {
        Ok(())
    } else {
        Err(RelayError::forbidden("no relationship to this order"))
    }
}

/// Who may follow an order's live topic. Stricter than [`check_visible`]: a provider browsing a
/// pending order is not a party to it, and nothing revokes a subscription when someone else
/// accepts.
pub fn check_watch(order: &Order, caller: &CallerContext) -> Result<(), RelayError> {
    if caller.role == Role::Operator || order.is_party(&caller.user_id) {
        Ok(())
    } else {
        Err(RelayError::forbidden("only the parties to an order can watch it"))
    }
}
