//! Friend requests between the primary and secondary users

use async_trait::async_trait;
use lowkey_common::HarnessResult;
use lowkey_core::{AcceptFriendRequest, FriendRequest, User};
use tracing::info;

use super::{expect, Case};
use crate::client::ApiClient;
use crate::context::TestContext;

/// GET /friends/{userId}
pub async fn friends_of(client: &ApiClient, user_id: &str) -> HarnessResult<Vec<User>> {
    client.get(&format!("/friends/{user_id}")).await?.json()
}

/// Primary sends a friend request to secondary
pub struct Request;

#[async_trait]
impl Case for Request {
    fn name(&self) -> &'static str {
        "friends_request"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let (primary, secondary) = ctx.ensure_pair().await?;
        let request = FriendRequest {
            from_user_id: primary.id().to_string(),
            to_user_id: secondary.id().to_string(),
        };

        let body = ctx.client().post("/friends/request", &request).await?.value()?;
        expect::object(&body)?;
        info!("Friend request sent");
        Ok(())
    }
}

/// Secondary accepts the primary user's request
pub struct Accept;

#[async_trait]
impl Case for Accept {
    fn name(&self) -> &'static str {
        "friends_accept"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let (primary, secondary) = ctx.ensure_pair().await?;
        let request = AcceptFriendRequest {
            user_id: secondary.id().to_string(),
            friend_id: primary.id().to_string(),
        };

        let body = ctx.client().post("/friends/accept", &request).await?.value()?;
        expect::object(&body)?;
        info!("Friend request accepted");
        Ok(())
    }
}

/// After accepting, each user lists the other as a friend
pub struct List;

#[async_trait]
impl Case for List {
    fn name(&self) -> &'static str {
        "friends_list"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let (primary, secondary) = ctx.ensure_pair().await?;

        for (user, friend) in [(&primary, &secondary), (&secondary, &primary)] {
            let friends = friends_of(ctx.client(), user.id()).await?;
            expect::that(friends.iter().any(|f| f.id == friend.id()), || {
                format!("user {} does not list {} as a friend", user.id(), friend.id())
            })?;
        }
        info!("Friendship visible to both users");
        Ok(())
    }
}
