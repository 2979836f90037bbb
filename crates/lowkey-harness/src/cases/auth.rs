//! Registration, login and password recovery

use async_trait::async_trait;
use lowkey_common::{HarnessError, HarnessResult};
use lowkey_core::{AuthSession, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest};
use reqwest::{Method, StatusCode};
use tracing::info;

use super::{expect, Case};
use crate::client::{ApiClient, ApiResponse};
use crate::context::TestContext;
use crate::fixtures::UserRole;

/// Error the API returns for a reset token it did not issue
pub const INVALID_RESET_TOKEN_ERROR: &str = "Invalid or expired reset token";

/// POST /auth/reset-password with a token the API never issued
///
/// No status is enforced here; the response is handed back as received.
pub async fn reset_password_with_fabricated_token(client: &ApiClient) -> HarnessResult<ApiResponse> {
    let request = ResetPasswordRequest {
        token: "dummy_token_for_testing".to_string(),
        email: "test@example.com".to_string(),
        password: "newpassword123".to_string(),
    };

    client
        .request(Method::POST, "/auth/reset-password", Some(&request), None)
        .await
}

/// The reset response must be a 400 carrying the invalid-token error
pub fn check_reset_rejection(response: &ApiResponse) -> HarnessResult<()> {
    if response.status != StatusCode::BAD_REQUEST {
        return Err(HarnessError::UnexpectedStatus {
            expected: StatusCode::BAD_REQUEST.as_u16(),
            actual: response.status.as_u16(),
            body: response.body.clone(),
        });
    }

    let body = response.value()?;
    let error = expect::str_field(&body, "error")?;
    expect::that(error.contains(INVALID_RESET_TOKEN_ERROR), || {
        format!("error {error:?} does not mention {INVALID_RESET_TOKEN_ERROR:?}")
    })
}

/// Send the fabricated-token reset and check it is rejected
pub async fn check_reset_password_rejected(client: &ApiClient) -> HarnessResult<()> {
    let response = reset_password_with_fabricated_token(client).await?;
    info!(
        status = response.status.as_u16(),
        body = %response.body,
        "Reset password answered {}",
        response.status.as_u16()
    );
    check_reset_rejection(&response)
}

async fn login_as(
    ctx: &TestContext,
    request: &LoginRequest,
    expected_user_id: &str,
) -> HarnessResult<()> {
    let session: AuthSession = ctx.client().post("/auth/login", request).await?.json()?;

    expect::equal("logged-in user id", session.user.id.as_str(), expected_user_id)?;
    expect::that(!session.token.is_empty(), || {
        "login returned an empty token".to_string()
    })
}

/// Register the primary user
pub struct Register;

#[async_trait]
impl Case for Register {
    fn name(&self) -> &'static str {
        "auth_register"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let fixture = ctx.register_user(UserRole::Primary).await?;
        expect::equal(
            "display name",
            fixture.user.display_name.as_str(),
            fixture.credentials.display_name.as_str(),
        )?;
        expect::that(fixture.user.matches_identifier(&fixture.credentials.email), || {
            format!(
                "registered user email {:?} does not match {:?}",
                fixture.user.email, fixture.credentials.email
            )
        })?;
        info!(user_id = %fixture.id(), "User registration successful");
        Ok(())
    }
}

/// Log in with the primary user's email
pub struct LoginWithEmail;

#[async_trait]
impl Case for LoginWithEmail {
    fn name(&self) -> &'static str {
        "auth_login_email"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        login_as(ctx, &LoginRequest::with_email(&primary.credentials), primary.id()).await?;
        info!("Login with email successful");
        Ok(())
    }
}

/// Log in with the primary user's display name
pub struct LoginWithDisplayName;

#[async_trait]
impl Case for LoginWithDisplayName {
    fn name(&self) -> &'static str {
        "auth_login_display_name"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        login_as(
            ctx,
            &LoginRequest::with_display_name(&primary.credentials),
            primary.id(),
        )
        .await?;
        info!("Login with display name successful");
        Ok(())
    }
}

/// A wrong password is refused with 401
pub struct LoginInvalidPassword;

#[async_trait]
impl Case for LoginInvalidPassword {
    fn name(&self) -> &'static str {
        "auth_login_invalid_password"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        let request = LoginRequest {
            identifier: primary.credentials.email.clone(),
            password: format!("{}-wrong", primary.credentials.password),
        };

        let body = ctx
            .client()
            .request(
                Method::POST,
                "/auth/login",
                Some(&request),
                Some(StatusCode::UNAUTHORIZED),
            )
            .await?
            .value()?;
        expect::str_field(&body, "error")?;
        info!("Invalid password rejected");
        Ok(())
    }
}

/// Request a password reset email for the primary user
pub struct ForgotPassword;

#[async_trait]
impl Case for ForgotPassword {
    fn name(&self) -> &'static str {
        "auth_forgot_password"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let primary = ctx.fixtures().require_user(UserRole::Primary)?.clone();
        let request = ForgotPasswordRequest {
            email: primary.credentials.email.clone(),
        };

        let body = ctx
            .client()
            .post("/auth/forgot-password", &request)
            .await?
            .value()?;
        expect::object(&body)?;
        info!("Forgot password accepted");
        Ok(())
    }
}

/// A fabricated reset token is rejected
pub struct ResetPasswordInvalidToken;

#[async_trait]
impl Case for ResetPasswordInvalidToken {
    fn name(&self) -> &'static str {
        "auth_reset_password_invalid_token"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        check_reset_password_rejected(ctx.client()).await?;
        info!("Reset password rejects invalid token");
        Ok(())
    }
}
