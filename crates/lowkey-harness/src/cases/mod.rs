//! Workflow cases
//!
//! Each case is a predicate over one or more API calls. Cases run in the
//! order `all_cases` lists them and share fixtures through `TestContext`.

pub mod auth;
pub mod conversations;
pub mod expect;
pub mod friends;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod scenario;
pub mod users;

use async_trait::async_trait;
use lowkey_common::HarnessResult;

use crate::context::TestContext;

/// A single named check against the API
#[async_trait]
pub trait Case: Send + Sync {
    /// Name reported in the summary
    fn name(&self) -> &'static str;

    /// Run the check; any error marks the case failed
    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()>;
}

/// Every case, in run order
pub fn all_cases() -> Vec<Box<dyn Case>> {
    vec![
        // Health
        Box::new(health::HealthCheck),
        // Auth
        Box::new(auth::Register),
        Box::new(auth::LoginWithEmail),
        Box::new(auth::LoginWithDisplayName),
        Box::new(auth::LoginInvalidPassword),
        Box::new(auth::ForgotPassword),
        Box::new(auth::ResetPasswordInvalidToken),
        // Users
        Box::new(users::GetAll),
        Box::new(users::GetSpecific),
        Box::new(users::GetUnknown),
        Box::new(users::VerifyToggle),
        // Conversations
        Box::new(conversations::Create),
        Box::new(conversations::CreateIdempotent),
        Box::new(conversations::GetForUser),
        Box::new(conversations::NonFriendCreate),
        Box::new(conversations::Accept),
        // Messages
        Box::new(messages::SendMessage),
        Box::new(messages::GetForConversation),
        // Notifications
        Box::new(notifications::OnMessage),
        Box::new(notifications::Create),
        Box::new(notifications::GetForUser),
        Box::new(notifications::MarkRead),
        // Friends
        Box::new(friends::Request),
        Box::new(friends::Accept),
        Box::new(friends::List),
        // End to end
        Box::new(scenario::DirectMessageFlow),
    ]
}
