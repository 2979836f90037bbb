//! Fixture registry
//!
//! Entities created during a run, kept in creation order. Users and
//! conversations are also addressable by role, so a case asks for "the
//! secondary user" instead of whatever happens to sit at index 1.

use std::fmt;

use lowkey_common::{HarnessError, HarnessResult};
use lowkey_core::{Conversation, Message, Notification, RegisterRequest, User};

/// Part a registered user plays in the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Account exercised by the auth and user cases
    Primary,
    /// Counterpart of `Primary` in the direct conversation
    Secondary,
    /// Opens the non-friend conversation with `Primary`
    Stranger,
    /// Fresh accounts for the end-to-end scenario
    Sender,
    Recipient,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Stranger => "stranger",
            Self::Sender => "sender",
            Self::Recipient => "recipient",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part a conversation plays in the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationRole {
    /// Primary <-> Secondary
    Direct,
    /// Stranger -> Primary, created with `isFromNonFriend`
    NonFriend,
    /// Sender <-> Recipient
    Scenario,
}

impl ConversationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::NonFriend => "non-friend",
            Self::Scenario => "scenario",
        }
    }
}

impl fmt::Display for ConversationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user registered by the harness, with the credentials used to create it
#[derive(Debug, Clone)]
pub struct UserFixture {
    pub role: UserRole,
    pub user: User,
    pub token: String,
    pub credentials: RegisterRequest,
}

impl UserFixture {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

/// A conversation created by the harness
#[derive(Debug, Clone)]
pub struct ConversationFixture {
    pub role: ConversationRole,
    pub conversation: Conversation,
}

impl ConversationFixture {
    pub fn id(&self) -> &str {
        &self.conversation.id
    }
}

/// Everything created during one run
#[derive(Debug, Default)]
pub struct FixtureRegistry {
    users: Vec<UserFixture>,
    conversations: Vec<ConversationFixture>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Registered users in creation order
    pub fn users(&self) -> &[UserFixture] {
        &self.users
    }

    /// Most recently registered user for `role`
    pub fn user(&self, role: UserRole) -> Option<&UserFixture> {
        self.users.iter().rev().find(|u| u.role == role)
    }

    /// Like `user`, but a missing role fails the calling case
    pub fn require_user(&self, role: UserRole) -> HarnessResult<&UserFixture> {
        self.user(role)
            .ok_or_else(|| HarnessError::missing_fixture(format!("{role} user")))
    }

    pub fn add_user(&mut self, fixture: UserFixture) {
        self.users.push(fixture);
    }

    // =========================================================================
    // Conversations
    // =========================================================================

    /// Created conversations in creation order
    pub fn conversations(&self) -> &[ConversationFixture] {
        &self.conversations
    }

    pub fn conversation(&self, role: ConversationRole) -> Option<&ConversationFixture> {
        self.conversations.iter().rev().find(|c| c.role == role)
    }

    pub fn require_conversation(&self, role: ConversationRole) -> HarnessResult<&ConversationFixture> {
        self.conversation(role)
            .ok_or_else(|| HarnessError::missing_fixture(format!("{role} conversation")))
    }

    /// Conversations opened through the non-friend flow
    pub fn non_friend_conversations(&self) -> impl Iterator<Item = &ConversationFixture> {
        self.conversations
            .iter()
            .filter(|c| c.role == ConversationRole::NonFriend)
    }

    pub fn add_conversation(&mut self, role: ConversationRole, conversation: Conversation) {
        self.conversations.push(ConversationFixture { role, conversation });
    }

    /// Store the latest server state of an already registered conversation.
    /// Returns false if no conversation with that id was registered.
    pub fn refresh_conversation(&mut self, conversation: Conversation) -> bool {
        match self
            .conversations
            .iter_mut()
            .find(|c| c.conversation.id == conversation.id)
        {
            Some(fixture) => {
                fixture.conversation = conversation;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Messages and notifications
    // =========================================================================

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Most recent message sent in `conversation_id`
    pub fn last_message_in(&self, conversation_id: &str) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.conversation_id == conversation_id)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}
