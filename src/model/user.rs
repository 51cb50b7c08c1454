use crate::context::Role;
use crate::model::UserId;
use serde::{Deserialize, Serialize};

/// The slice of a user profile the relay reads from the [`UserDirectory`](crate::collaborators::UserDirectory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl UserProfile {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}
