//! The authenticated caller.
//!
//! Identity is issued elsewhere; every operation receives it explicitly as a
//! [`CallerContext`] instead of trusting ids found inside a request body.

use crate::model::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Places orders.
    Requester,
    /// Fulfils orders.
    Provider,
    /// Administrative override.
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Requester => "requester",
            Role::Provider => "provider",
            Role::Operator => "operator",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: UserId,
    pub role: Role,
}

impl CallerContext {
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn requester(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Requester)
    }

    pub fn provider(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Provider)
    }

    pub fn operator(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Operator)
    }

    pub fn is(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}
