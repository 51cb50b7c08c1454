//! Plain data types shared by the actors, the coordinator and the live channel.

pub mod conversation;
pub mod event;
pub mod ids;
pub mod location;
pub mod notification;
pub mod order;
pub mod user;

pub use conversation::*;
pub use event::*;
pub use ids::*;
pub use location::*;
pub use notification::*;
pub use order::*;
pub use user::*;
