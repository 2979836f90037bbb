//! Test context and fixture builders
//!
//! One `TestContext` lives for the whole run and is handed to every case.
//! Builders are lazy: they return the fixture for a role if it already
//! exists and create it through the API otherwise.

use lowkey_common::{HarnessConfig, HarnessError, HarnessResult};
use lowkey_core::{AuthSession, Conversation, CreateConversationRequest, RegisterRequest};
use tracing::info;

use crate::client::ApiClient;
use crate::fixtures::{ConversationRole, FixtureRegistry, UserFixture, UserRole};

/// State shared by the cases of one run
#[derive(Debug)]
pub struct TestContext {
    client: ApiClient,
    config: HarnessConfig,
    fixtures: FixtureRegistry,
}

impl TestContext {
    /// Create a context with an empty fixture registry
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        Ok(Self {
            client,
            config,
            fixtures: FixtureRegistry::new(),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn fixtures(&self) -> &FixtureRegistry {
        &self.fixtures
    }

    pub fn fixtures_mut(&mut self) -> &mut FixtureRegistry {
        &mut self.fixtures
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new account with random credentials under `role`
    pub async fn register_user(&mut self, role: UserRole) -> HarnessResult<UserFixture> {
        let credentials = RegisterRequest::unique(role.as_str());
        let session: AuthSession = self
            .client
            .post("/auth/register", &credentials)
            .await?
            .json()?;

        if session.token.is_empty() {
            return Err(HarnessError::schema("registration returned an empty token"));
        }

        info!(role = %role, user_id = %session.user.id, "Registered test user");
        let fixture = UserFixture {
            role,
            user: session.user,
            token: session.token,
            credentials,
        };
        self.fixtures.add_user(fixture.clone());
        Ok(fixture)
    }

    /// User for `role`, registering one if the run has none yet
    pub async fn ensure_user(&mut self, role: UserRole) -> HarnessResult<UserFixture> {
        if let Some(existing) = self.fixtures.user(role) {
            return Ok(existing.clone());
        }
        self.register_user(role).await
    }

    /// Primary and secondary users
    pub async fn ensure_pair(&mut self) -> HarnessResult<(UserFixture, UserFixture)> {
        let primary = self.ensure_user(UserRole::Primary).await?;
        let secondary = self.ensure_user(UserRole::Secondary).await?;
        Ok((primary, secondary))
    }

    // =========================================================================
    // Conversations
    // =========================================================================

    /// Create a conversation and register it under `role`
    ///
    /// The response must carry an id and list both requested participants.
    pub async fn create_conversation(
        &mut self,
        role: ConversationRole,
        request: &CreateConversationRequest,
    ) -> HarnessResult<Conversation> {
        let conversation = self.post_conversation(request).await?;
        info!(role = %role, conversation_id = %conversation.id, "Created conversation");
        self.fixtures.add_conversation(role, conversation.clone());
        Ok(conversation)
    }

    /// POST /conversations and check the response, without registering it
    async fn post_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> HarnessResult<Conversation> {
        let conversation: Conversation = self
            .client
            .post("/conversations", request)
            .await?
            .json()?;

        if conversation.id.is_empty() {
            return Err(HarnessError::schema("conversation returned without an id"));
        }
        for participant in &request.participants {
            if !conversation.has_participant(participant) {
                return Err(HarnessError::assertion(format!(
                    "conversation {} does not list participant {participant}",
                    conversation.id
                )));
            }
        }

        Ok(conversation)
    }

    /// Conversation between the primary and secondary users
    pub async fn ensure_direct_conversation(&mut self) -> HarnessResult<Conversation> {
        if let Some(existing) = self.fixtures.conversation(ConversationRole::Direct) {
            return Ok(existing.conversation.clone());
        }

        let (primary, secondary) = self.ensure_pair().await?;
        let request = CreateConversationRequest::between(primary.id(), secondary.id());
        self.create_conversation(ConversationRole::Direct, &request)
            .await
    }

    /// Conversation opened by the stranger towards the primary user
    ///
    /// The API must hold it as not accepted until the primary user accepts.
    /// A conversation that fails this check is not registered.
    pub async fn ensure_non_friend_conversation(&mut self) -> HarnessResult<Conversation> {
        if let Some(existing) = self.fixtures.conversation(ConversationRole::NonFriend) {
            return Ok(existing.conversation.clone());
        }

        let primary = self.ensure_user(UserRole::Primary).await?;
        let stranger = self.ensure_user(UserRole::Stranger).await?;
        let request = CreateConversationRequest::from_non_friend(stranger.id(), primary.id());
        let conversation = self.post_conversation(&request).await?;

        if conversation.accepted != Some(false) {
            return Err(HarnessError::assertion(format!(
                "non-friend conversation {} should start with accepted=false, got {:?}",
                conversation.id, conversation.accepted
            )));
        }

        let role = ConversationRole::NonFriend;
        info!(role = %role, conversation_id = %conversation.id, "Created conversation");
        self.fixtures.add_conversation(role, conversation.clone());
        Ok(conversation)
    }
}
