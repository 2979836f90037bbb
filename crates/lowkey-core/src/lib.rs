//! # lowkey-core
//!
//! Wire types exchanged with the LowKey messaging API: the entities the API
//! returns and the request bodies the harness sends.
//! This crate performs no I/O.

pub mod entities;
pub mod requests;

// Re-export commonly used types at crate root
pub use entities::{
    AuthSession, Conversation, LastMessage, Message, Notification, SuccessResponse, User,
};
pub use requests::{
    AcceptFriendRequest, CreateConversationRequest, CreateNotificationRequest,
    ForgotPasswordRequest, FriendRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SendMessageRequest, VerifyRequest,
};
