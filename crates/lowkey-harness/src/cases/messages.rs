//! Sending and listing messages

use async_trait::async_trait;
use lowkey_common::HarnessResult;
use lowkey_core::{Message, SendMessageRequest};
use tracing::info;

use super::{expect, Case};
use crate::client::ApiClient;
use crate::context::TestContext;
use crate::fixtures::{ConversationRole, UserRole};

/// Content of the message the harness sends
pub const GREETING: &str = "Hello! This is a test message from the API testing script.";

/// POST /messages, checking the content comes back unaltered
pub async fn send_message(
    client: &ApiClient,
    conversation_id: &str,
    sender_id: &str,
    content: &str,
) -> HarnessResult<Message> {
    let request = SendMessageRequest {
        conversation_id: conversation_id.to_string(),
        sender_id: sender_id.to_string(),
        content: content.to_string(),
    };
    let message: Message = client.post("/messages", &request).await?.json()?;

    expect::that(!message.id.is_empty(), || "message returned without an id".to_string())?;
    expect::equal("message content", message.content.as_str(), content)?;
    expect::equal("message sender", message.sender_id.as_str(), sender_id)?;
    Ok(message)
}

/// GET /messages/{conversationId}
pub async fn messages_in(client: &ApiClient, conversation_id: &str) -> HarnessResult<Vec<Message>> {
    client
        .get(&format!("/messages/{conversation_id}"))
        .await?
        .json()
}

/// The primary user sends a message in the direct conversation
pub struct SendMessage;

#[async_trait]
impl Case for SendMessage {
    fn name(&self) -> &'static str {
        "messages_send"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let conversation = ctx.ensure_direct_conversation().await?;
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();

        let message = send_message(ctx.client(), &conversation.id, primary.id(), GREETING).await?;
        info!(message_id = %message.id, "Send message successful");
        ctx.fixtures_mut().add_message(message);
        Ok(())
    }
}

/// GET /messages/{conversationId} lists the message sent earlier
pub struct GetForConversation;

#[async_trait]
impl Case for GetForConversation {
    fn name(&self) -> &'static str {
        "messages_get_for_conversation"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let conversation_id = ctx
            .fixtures()
            .require_conversation(ConversationRole::Direct)?
            .id()
            .to_string();
        let messages = messages_in(ctx.client(), &conversation_id).await?;
        info!(count = messages.len(), "Get messages for conversation successful");

        if let Some(sent) = ctx.fixtures().last_message_in(&conversation_id) {
            let listed = messages.iter().find(|m| m.id == sent.id);
            expect::that(listed.is_some_and(|m| m.content == sent.content), || {
                format!("message {} missing from conversation {conversation_id}", sent.id)
            })?;
        }
        Ok(())
    }
}
