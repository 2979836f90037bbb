//! User directory and verification

use async_trait::async_trait;
use lowkey_common::HarnessResult;
use lowkey_core::{requests::unique_suffix, User, VerifyRequest};
use reqwest::{Method, StatusCode};
use tracing::info;

use super::{expect, Case};
use crate::context::TestContext;
use crate::fixtures::UserRole;

/// GET /users returns a list that includes the primary user
pub struct GetAll;

#[async_trait]
impl Case for GetAll {
    fn name(&self) -> &'static str {
        "users_get_all"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let users: Vec<User> = ctx.client().get("/users").await?.json()?;
        info!(count = users.len(), "Get all users successful");

        if let Some(primary) = ctx.fixtures().user(UserRole::Primary) {
            expect::that(users.iter().any(|u| u.id == primary.id()), || {
                format!("user list does not contain primary user {}", primary.id())
            })?;
        }
        Ok(())
    }
}

/// GET /users/{id} returns that user
pub struct GetSpecific;

#[async_trait]
impl Case for GetSpecific {
    fn name(&self) -> &'static str {
        "users_get_specific"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        let user: User = ctx
            .client()
            .get(&format!("/users/{}", primary.id()))
            .await?
            .json()?;

        expect::equal("user id", user.id.as_str(), primary.id())?;
        expect::equal(
            "display name",
            user.display_name.as_str(),
            primary.credentials.display_name.as_str(),
        )?;
        info!("Get specific user successful");
        Ok(())
    }
}

/// GET /users/{id} for an id nobody has is a 404
pub struct GetUnknown;

#[async_trait]
impl Case for GetUnknown {
    fn name(&self) -> &'static str {
        "users_get_unknown"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let path = format!("/users/does-not-exist-{}", unique_suffix());
        let body = ctx
            .client()
            .request::<()>(Method::GET, &path, None, Some(StatusCode::NOT_FOUND))
            .await?
            .value()?;
        expect::str_field(&body, "error")?;
        info!("Unknown user returns 404");
        Ok(())
    }
}

/// PUT /users/{id}/verify echoes the requested flag, both ways
pub struct VerifyToggle;

#[async_trait]
impl Case for VerifyToggle {
    fn name(&self) -> &'static str {
        "users_verify_toggle"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        let path = format!("/users/{}/verify", primary.id());

        for verified in [true, false] {
            // Checked on the raw body: a missing flag must not read as false
            let body = ctx
                .client()
                .put(&path, &VerifyRequest { verified })
                .await?
                .value()?;
            expect::equal("user id", expect::str_field(&body, "id")?, primary.id())?;
            expect::equal("verified", expect::bool_field(&body, "verified")?, verified)?;
            info!(verified, "User verification toggle successful");
        }
        Ok(())
    }
}
