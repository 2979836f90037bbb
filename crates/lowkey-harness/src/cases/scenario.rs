//! End-to-end direct message flow on fresh accounts

use async_trait::async_trait;
use lowkey_common::HarnessResult;
use lowkey_core::CreateConversationRequest;
use tracing::info;

use super::messages::{messages_in, send_message, GREETING};
use super::notifications::{notifications_for, wait_for_dm_notification};
use super::{expect, Case};
use crate::context::TestContext;
use crate::fixtures::{ConversationRole, UserRole};

/// Register A and B, open [A, B], A sends a message; the message is listed
/// in the conversation and B is notified
pub struct DirectMessageFlow;

#[async_trait]
impl Case for DirectMessageFlow {
    fn name(&self) -> &'static str {
        "end_to_end_direct_message"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let sender = ctx.register_user(UserRole::Sender).await?;
        let recipient = ctx.register_user(UserRole::Recipient).await?;

        let request = CreateConversationRequest::between(sender.id(), recipient.id());
        let conversation = ctx
            .create_conversation(ConversationRole::Scenario, &request)
            .await?;

        let baseline = notifications_for(ctx.client(), recipient.id()).await?.len();
        let message = send_message(ctx.client(), &conversation.id, sender.id(), GREETING).await?;
        ctx.fixtures_mut().add_message(message.clone());

        let listed = messages_in(ctx.client(), &conversation.id).await?;
        expect::that(
            listed
                .iter()
                .any(|m| m.id == message.id && m.content == GREETING && m.sender_id == sender.id()),
            || format!("message {} missing from conversation {}", message.id, conversation.id),
        )?;

        let notification =
            wait_for_dm_notification(ctx, recipient.id(), sender.id(), baseline).await?;
        info!(
            conversation_id = %conversation.id,
            notification_id = %notification.id,
            "Direct message delivered and notified"
        );
        ctx.fixtures_mut().add_notification(notification);
        Ok(())
    }
}
