//! API entities
//!
//! Every entity deserializes from the camelCase JSON the API emits and
//! ignores fields the harness does not assert on.

mod conversation;
mod message;
mod notification;
mod user;

pub use conversation::{Conversation, LastMessage};
pub use message::Message;
pub use notification::{Notification, SuccessResponse};
pub use user::{AuthSession, User};
