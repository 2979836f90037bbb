//! Notifications, including the one fanned out for every direct message

use async_trait::async_trait;
use lowkey_common::{HarnessError, HarnessResult};
use lowkey_core::{requests::unique_suffix, CreateNotificationRequest, Notification, SuccessResponse};
use serde_json::json;
use tracing::info;

use super::messages::send_message;
use super::{expect, Case};
use crate::client::ApiClient;
use crate::context::TestContext;
use crate::fixtures::UserRole;
use crate::poll::poll_until;

/// Kind used for notifications the harness posts itself
pub const SYSTEM_KIND: &str = "system";

/// GET /notifications/{userId}, newest first
pub async fn notifications_for(client: &ApiClient, user_id: &str) -> HarnessResult<Vec<Notification>> {
    client
        .get(&format!("/notifications/{user_id}"))
        .await?
        .json()
}

/// Wait until `recipient_id` has more than `baseline` notifications and
/// the newest is a `dm` from `sender_id`
///
/// Polls at the configured interval and gives up at the configured timeout.
pub async fn wait_for_dm_notification(
    ctx: &TestContext,
    recipient_id: &str,
    sender_id: &str,
    baseline: usize,
) -> HarnessResult<Notification> {
    let client = ctx.client();
    let config = ctx.config();
    let what = format!("dm notification for {recipient_id} from {sender_id}");

    poll_until(&what, config.poll_interval, config.poll_timeout, || async move {
        let notifications = notifications_for(client, recipient_id).await?;
        if notifications.len() <= baseline {
            return Ok(None);
        }
        Ok(notifications
            .into_iter()
            .next()
            .filter(|newest| newest.is_dm_from(sender_id)))
    })
    .await
}

/// Post a `system` notification from the primary user to the secondary one
async fn create_notification(ctx: &mut TestContext) -> HarnessResult<Notification> {
    let (primary, secondary) = ctx.ensure_pair().await?;
    let request = CreateNotificationRequest {
        user_id: secondary.id().to_string(),
        kind: SYSTEM_KIND.to_string(),
        message: format!("Test notification {} from the API testing script", unique_suffix()),
        from_user_id: primary.id().to_string(),
    };

    let notification: Notification = ctx
        .client()
        .post("/notifications", &request)
        .await?
        .json()?;
    expect::that(!notification.id.is_empty(), || {
        "notification returned without an id".to_string()
    })?;
    expect::equal("notification type", notification.kind.as_str(), SYSTEM_KIND)?;
    expect::equal("notification user", notification.user_id.as_str(), secondary.id())?;
    expect::equal("notification message", notification.message.as_str(), request.message.as_str())?;

    ctx.fixtures_mut().add_notification(notification.clone());
    Ok(notification)
}

/// Sending a direct message notifies the recipient
pub struct OnMessage;

#[async_trait]
impl Case for OnMessage {
    fn name(&self) -> &'static str {
        "notifications_on_message"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let conversation = ctx.ensure_direct_conversation().await?;
        let (primary, secondary) = ctx.ensure_pair().await?;

        let baseline = notifications_for(ctx.client(), secondary.id()).await?.len();
        info!(baseline, "Recipient notification count before sending");

        let content = format!("Notification check {}", unique_suffix());
        let message = send_message(ctx.client(), &conversation.id, primary.id(), &content).await?;
        ctx.fixtures_mut().add_message(message);

        let notification =
            wait_for_dm_notification(ctx, secondary.id(), primary.id(), baseline).await?;
        if let Some(conversation_id) = &notification.conversation_id {
            expect::equal("notification conversation", conversation_id, &conversation.id)?;
        }

        info!(notification_id = %notification.id, "Message created a dm notification");
        ctx.fixtures_mut().add_notification(notification);
        Ok(())
    }
}

/// POST /notifications stores and echoes a notification
pub struct Create;

#[async_trait]
impl Case for Create {
    fn name(&self) -> &'static str {
        "notifications_create"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let notification = create_notification(ctx).await?;
        info!(notification_id = %notification.id, "Create notification successful");
        Ok(())
    }
}

/// GET /notifications/{userId} is non-empty and newest first
pub struct GetForUser;

#[async_trait]
impl Case for GetForUser {
    fn name(&self) -> &'static str {
        "notifications_get_for_user"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let secondary = ctx.fixtures().require_user(UserRole::Secondary)?.clone();
        let notifications = notifications_for(ctx.client(), secondary.id()).await?;

        expect::that(!notifications.is_empty(), || {
            format!("no notifications listed for user {}", secondary.id())
        })?;
        for pair in notifications.windows(2) {
            if let (Some(newer), Some(older)) = (pair[0].created_at, pair[1].created_at) {
                expect::that(newer >= older, || {
                    format!(
                        "notifications not sorted newest first: {} ({newer}) before {} ({older})",
                        pair[0].id, pair[1].id
                    )
                })?;
            }
        }

        let recorded = ctx
            .fixtures()
            .notifications()
            .iter()
            .filter(|n| n.user_id == secondary.id());
        for notification in recorded {
            expect::that(notifications.iter().any(|n| n.id == notification.id), || {
                format!("notification {} missing from the list", notification.id)
            })?;
        }

        info!(count = notifications.len(), "Get notifications for user successful");
        Ok(())
    }
}

/// PUT /notifications/{id}/read acknowledges and flips `read`
pub struct MarkRead;

#[async_trait]
impl Case for MarkRead {
    fn name(&self) -> &'static str {
        "notifications_mark_read"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let recorded = ctx.fixtures().last_notification().cloned();
        let target = match recorded {
            Some(existing) => existing,
            None => create_notification(ctx).await?,
        };

        let ack: SuccessResponse = ctx
            .client()
            .put(&format!("/notifications/{}/read", target.id), &json!({}))
            .await?
            .json()?;
        expect::equal("success", ack.success, true)?;

        let reread = notifications_for(ctx.client(), &target.user_id)
            .await?
            .into_iter()
            .find(|n| n.id == target.id)
            .ok_or_else(|| {
                HarnessError::assertion(format!(
                    "notification {} missing after marking it read",
                    target.id
                ))
            })?;
        expect::equal("read", reread.read, true)?;

        info!(notification_id = %target.id, "Notification marked read");
        Ok(())
    }
}
