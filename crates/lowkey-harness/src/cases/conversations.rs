//! Conversations between users, including the non-friend accept flow

use async_trait::async_trait;
use lowkey_common::{HarnessError, HarnessResult};
use lowkey_core::{Conversation, CreateConversationRequest};
use serde_json::json;
use tracing::info;

use super::{expect, Case};
use crate::client::ApiClient;
use crate::context::TestContext;
use crate::fixtures::{ConversationRole, UserRole};

/// Conversations listed for `user_id`
pub async fn conversations_for(client: &ApiClient, user_id: &str) -> HarnessResult<Vec<Conversation>> {
    client
        .get(&format!("/conversations/{user_id}"))
        .await?
        .json()
}

fn expect_accepted(conversation: &Conversation) -> HarnessResult<()> {
    expect::equal("accepted", conversation.accepted, Some(true))?;
    expect::equal("isFromNonFriend", conversation.is_from_non_friend, Some(false))
}

/// POST /conversations between the primary and secondary users
pub struct Create;

#[async_trait]
impl Case for Create {
    fn name(&self) -> &'static str {
        "conversations_create"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let (primary, secondary) = ctx.ensure_pair().await?;
        let request = CreateConversationRequest::between(primary.id(), secondary.id());
        let conversation = ctx
            .create_conversation(ConversationRole::Direct, &request)
            .await?;
        expect::equal("participant count", conversation.participants.len(), 2)?;
        info!(conversation_id = %conversation.id, "Create conversation successful");
        Ok(())
    }
}

/// Creating the same pair again returns the existing conversation
pub struct CreateIdempotent;

#[async_trait]
impl Case for CreateIdempotent {
    fn name(&self) -> &'static str {
        "conversations_create_idempotent"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let existing = ctx.ensure_direct_conversation().await?;
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        let secondary = ctx.fixtures().require_user(UserRole::Secondary)?.clone();

        // Reversed participant order must still resolve to the same pair
        let request = CreateConversationRequest::between(secondary.id(), primary.id());
        let again: Conversation = ctx.client().post("/conversations", &request).await?.json()?;

        expect::equal("conversation id", again.id.as_str(), existing.id.as_str())?;
        info!("Existing conversation returned for the same participants");
        Ok(())
    }
}

/// GET /conversations/{userId} lists the conversation for both participants
pub struct GetForUser;

#[async_trait]
impl Case for GetForUser {
    fn name(&self) -> &'static str {
        "conversations_get_for_user"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let conversation = ctx
            .fixtures()
            .require_conversation(ConversationRole::Direct)?
            .conversation
            .clone();

        for participant in &conversation.participants {
            let listed = conversations_for(ctx.client(), participant).await?;
            expect::that(!listed.is_empty(), || {
                format!("no conversations listed for user {participant}")
            })?;
            expect::that(listed.iter().any(|c| c.id == conversation.id), || {
                format!(
                    "conversation {} missing from the list of user {participant}",
                    conversation.id
                )
            })?;
            info!(
                user_id = %participant,
                count = listed.len(),
                "Get conversations for user successful"
            );
        }
        Ok(())
    }
}

/// A conversation from a non-friend starts out unaccepted
pub struct NonFriendCreate;

#[async_trait]
impl Case for NonFriendCreate {
    fn name(&self) -> &'static str {
        "conversations_non_friend_create"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let conversation = ctx.ensure_non_friend_conversation().await?;
        if let Some(flag) = conversation.is_from_non_friend {
            expect::equal("isFromNonFriend", flag, true)?;
        }
        info!(conversation_id = %conversation.id, "Non-friend conversation pending acceptance");
        Ok(())
    }
}

/// PUT /conversations/{id}/accept turns the non-friend conversation into a
/// normal one, and the change is visible when listing it again
pub struct Accept;

#[async_trait]
impl Case for Accept {
    fn name(&self) -> &'static str {
        "conversations_accept"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let pending = ctx.ensure_non_friend_conversation().await?;
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();

        let accepted: Conversation = ctx
            .client()
            .put(&format!("/conversations/{}/accept", pending.id), &json!({}))
            .await?
            .json()?;
        expect::equal("conversation id", accepted.id.as_str(), pending.id.as_str())?;
        expect_accepted(&accepted)?;

        let listed = conversations_for(ctx.client(), primary.id()).await?;
        let reread = listed
            .into_iter()
            .find(|c| c.id == pending.id)
            .ok_or_else(|| {
                HarnessError::assertion(format!(
                    "accepted conversation {} missing from the list of user {}",
                    pending.id,
                    primary.id()
                ))
            })?;
        expect_accepted(&reread)?;

        ctx.fixtures_mut().refresh_conversation(reread);
        info!(conversation_id = %pending.id, "Conversation accepted");
        Ok(())
    }
}
