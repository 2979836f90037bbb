//! In-memory LowKey API
//!
//! Serves the same routes and response shapes as the real deployment so the
//! harness can be exercised end to end without network access. Direct
//! message notifications are written by a background task after a
//! configurable delay, the way the real backend fans them out.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use lowkey_core::{
    AcceptFriendRequest, AuthSession, Conversation, CreateConversationRequest,
    CreateNotificationRequest, ForgotPasswordRequest, FriendRequest, LastMessage, LoginRequest,
    Message, Notification, RegisterRequest, ResetPasswordRequest, SendMessageRequest, User,
    VerifyRequest,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

/// When the notification for a direct message is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmFanout {
    /// Written before the send call returns
    Immediate,
    /// Written by a background task after the delay
    Delayed(Duration),
    /// Never written
    Disabled,
}

impl Default for DmFanout {
    fn default() -> Self {
        Self::Delayed(Duration::from_millis(50))
    }
}

/// A rule the fake API can be told to break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// reset-password answers 200 to any token
    ResetAccepted,
    /// reset-password answers 400 with a different error
    ResetOtherError,
    /// sent messages come back with altered content
    AlteredContent,
    /// non-friend conversations start out accepted
    NonFriendAccepted,
    /// verify leaves the flag unchanged
    VerifyIgnored,
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    passwords: HashMap<String, String>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
    friend_requests: HashSet<(String, String)>,
    friends: HashMap<String, HashSet<String>>,
}

impl Store {
    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn befriend(&mut self, a: &str, b: &str) {
        self.friends
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.friends
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }
}

/// Shared state of the fake API
#[derive(Clone)]
pub struct FakeApi {
    store: Arc<Mutex<Store>>,
    fanout: DmFanout,
    faults: Arc<HashSet<Fault>>,
}

impl FakeApi {
    pub fn new(fanout: DmFanout) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            fanout,
            faults: Arc::default(),
        }
    }

    /// Break `fault` from now on
    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        Arc::make_mut(&mut self.faults).insert(fault);
        self
    }

    fn breaks(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    /// Number of registered users
    pub async fn user_count(&self) -> usize {
        self.store.lock().await.users.len()
    }

    /// Notifications stored for `user_id`, in insertion order
    pub async fn notifications_of(&self, user_id: &str) -> Vec<Notification> {
        self.store
            .lock()
            .await
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/health", get(health))
            // Auth
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/auth/forgot-password", post(forgot_password))
            .route("/auth/reset-password", post(reset_password))
            // Users
            .route("/users", get(list_users))
            .route("/users/:id", get(get_user))
            .route("/users/:id/verify", put(verify_user))
            // Conversations
            .route("/conversations", post(create_conversation))
            .route("/conversations/:id", get(list_conversations))
            .route("/conversations/:id/accept", put(accept_conversation))
            // Messages
            .route("/messages", post(send_message))
            .route("/messages/:id", get(list_messages))
            // Notifications
            .route("/notifications", post(create_notification))
            .route("/notifications/:id", get(list_notifications))
            .route("/notifications/:id/read", put(mark_read))
            // Friends
            .route("/friends/request", post(friend_request))
            .route("/friends/accept", post(accept_friend))
            .route("/friends/:id", get(list_friends))
            .with_state(self.clone())
    }
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new(DmFanout::default())
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Health
// ============================================================================

async fn root() -> Json<Value> {
    Json(json!({ "message": "LowKey API v1.0" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": Utc::now() }))
}

// ============================================================================
// Auth
// ============================================================================

async fn register(State(api): State<FakeApi>, Json(req): Json<RegisterRequest>) -> Response {
    let mut store = api.store.lock().await;
    if store
        .users
        .iter()
        .any(|u| u.email.eq_ignore_ascii_case(&req.email))
    {
        return error(StatusCode::BAD_REQUEST, "User already exists");
    }

    let user = User {
        id: new_id(),
        email: req.email,
        display_name: req.display_name,
        verified: false,
        created_at: Some(Utc::now()),
    };
    store.passwords.insert(user.id.clone(), req.password);
    store.users.push(user.clone());

    Json(AuthSession {
        token: new_id(),
        user,
    })
    .into_response()
}

async fn login(State(api): State<FakeApi>, Json(req): Json<LoginRequest>) -> Response {
    let store = api.store.lock().await;
    let user = store
        .users
        .iter()
        .find(|u| u.matches_identifier(&req.identifier))
        .filter(|u| store.passwords.get(&u.id) == Some(&req.password));

    match user {
        Some(user) => Json(AuthSession {
            user: user.clone(),
            token: new_id(),
        })
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn forgot_password(Json(_req): Json<ForgotPasswordRequest>) -> Json<Value> {
    Json(json!({ "message": "If an account exists, a reset email has been sent" }))
}

async fn reset_password(
    State(api): State<FakeApi>,
    Json(_req): Json<ResetPasswordRequest>,
) -> Response {
    if api.breaks(Fault::ResetAccepted) {
        return Json(json!({ "message": "Password reset successful" })).into_response();
    }
    if api.breaks(Fault::ResetOtherError) {
        return error(StatusCode::BAD_REQUEST, "Token is required");
    }
    // No reset tokens are ever issued here
    error(StatusCode::BAD_REQUEST, "Invalid or expired reset token")
}

// ============================================================================
// Users
// ============================================================================

async fn list_users(State(api): State<FakeApi>) -> Json<Vec<User>> {
    Json(api.store.lock().await.users.clone())
}

async fn get_user(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    match api.store.lock().await.user(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn verify_user(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    Json(req): Json<VerifyRequest>,
) -> Response {
    let mut store = api.store.lock().await;
    match store.users.iter_mut().find(|u| u.id == id) {
        Some(user) => {
            if !api.breaks(Fault::VerifyIgnored) {
                user.verified = req.verified;
            }
            Json(user.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

// ============================================================================
// Conversations
// ============================================================================

async fn create_conversation(
    State(api): State<FakeApi>,
    Json(req): Json<CreateConversationRequest>,
) -> Json<Conversation> {
    let mut store = api.store.lock().await;
    let [a, b] = &req.participants;

    if let Some(existing) = store
        .conversations
        .iter()
        .find(|c| c.has_participant(a) && c.has_participant(b))
    {
        return Json(existing.clone());
    }

    let from_non_friend = req.is_from_non_friend.unwrap_or(false);
    let now = Utc::now();
    let conversation = Conversation {
        id: new_id(),
        participants: req.participants.to_vec(),
        accepted: Some(!from_non_friend || api.breaks(Fault::NonFriendAccepted)),
        is_from_non_friend: Some(from_non_friend),
        last_message: None,
        created_at: Some(now),
        updated_at: Some(now),
    };
    store.conversations.push(conversation.clone());
    Json(conversation)
}

async fn list_conversations(
    State(api): State<FakeApi>,
    Path(user_id): Path<String>,
) -> Json<Vec<Conversation>> {
    let store = api.store.lock().await;
    let mut listed: Vec<_> = store
        .conversations
        .iter()
        .filter(|c| c.has_participant(&user_id))
        .cloned()
        .collect();
    listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Json(listed)
}

async fn accept_conversation(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut store = api.store.lock().await;
    match store.conversations.iter_mut().find(|c| c.id == id) {
        Some(conversation) => {
            conversation.accepted = Some(true);
            conversation.is_from_non_friend = Some(false);
            conversation.updated_at = Some(Utc::now());
            Json(conversation.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Conversation not found"),
    }
}

// ============================================================================
// Messages
// ============================================================================

async fn send_message(State(api): State<FakeApi>, Json(req): Json<SendMessageRequest>) -> Response {
    let mut store = api.store.lock().await;
    let now = Utc::now();

    let recipients: Vec<String> = match store
        .conversations
        .iter_mut()
        .find(|c| c.id == req.conversation_id)
    {
        Some(conversation) => {
            conversation.last_message = Some(LastMessage {
                content: req.content.clone(),
                sender_id: req.sender_id.clone(),
            });
            conversation.updated_at = Some(now);
            conversation
                .participants
                .iter()
                .filter(|p| **p != req.sender_id)
                .cloned()
                .collect()
        }
        None => return error(StatusCode::NOT_FOUND, "Conversation not found"),
    };

    let content = if api.breaks(Fault::AlteredContent) {
        req.content.to_lowercase()
    } else {
        req.content
    };
    let message = Message {
        id: new_id(),
        conversation_id: req.conversation_id,
        sender_id: req.sender_id,
        content,
        read: false,
        created_at: Some(now),
    };
    store.messages.push(message.clone());

    let sender_name = store
        .user(&message.sender_id)
        .map_or_else(|| "someone".to_string(), |u| u.display_name.clone());
    let pending: Vec<Notification> = recipients
        .into_iter()
        .map(|user_id| Notification {
            id: new_id(),
            user_id,
            kind: Notification::DM.to_string(),
            message: format!("New message from {sender_name}"),
            from_user_id: Some(message.sender_id.clone()),
            conversation_id: Some(message.conversation_id.clone()),
            read: false,
            created_at: None,
        })
        .collect();

    match api.fanout {
        DmFanout::Immediate => push_notifications(&mut store, pending),
        DmFanout::Delayed(delay) => {
            let store = Arc::clone(&api.store);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                push_notifications(&mut *store.lock().await, pending);
            });
        }
        DmFanout::Disabled => {}
    }

    Json(message).into_response()
}

fn push_notifications(store: &mut Store, pending: Vec<Notification>) {
    let now = Utc::now();
    store
        .notifications
        .extend(pending.into_iter().map(|n| Notification {
            created_at: Some(now),
            ..n
        }));
}

async fn list_messages(
    State(api): State<FakeApi>,
    Path(conversation_id): Path<String>,
) -> Json<Vec<Message>> {
    let store = api.store.lock().await;
    Json(
        store
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect(),
    )
}

// ============================================================================
// Notifications
// ============================================================================

async fn create_notification(
    State(api): State<FakeApi>,
    Json(req): Json<CreateNotificationRequest>,
) -> Json<Notification> {
    let notification = Notification {
        id: new_id(),
        user_id: req.user_id,
        kind: req.kind,
        message: req.message,
        from_user_id: Some(req.from_user_id),
        conversation_id: None,
        read: false,
        created_at: Some(Utc::now()),
    };
    api.store
        .lock()
        .await
        .notifications
        .push(notification.clone());
    Json(notification)
}

async fn list_notifications(
    State(api): State<FakeApi>,
    Path(user_id): Path<String>,
) -> Json<Vec<Notification>> {
    let store = api.store.lock().await;
    // Reverse first so equal timestamps still come out newest first
    let mut listed: Vec<_> = store
        .notifications
        .iter()
        .rev()
        .filter(|n| n.user_id == user_id)
        .cloned()
        .collect();
    listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(listed)
}

async fn mark_read(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut store = api.store.lock().await;
    match store.notifications.iter_mut().find(|n| n.id == id) {
        Some(notification) => {
            notification.read = true;
            Json(json!({ "success": true })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Notification not found"),
    }
}

// ============================================================================
// Friends
// ============================================================================

async fn friend_request(State(api): State<FakeApi>, Json(req): Json<FriendRequest>) -> Response {
    let mut store = api.store.lock().await;
    if store.user(&req.from_user_id).is_none() || store.user(&req.to_user_id).is_none() {
        return error(StatusCode::NOT_FOUND, "User not found");
    }
    store
        .friend_requests
        .insert((req.from_user_id, req.to_user_id));
    Json(json!({ "success": true, "message": "Friend request sent" })).into_response()
}

async fn accept_friend(
    State(api): State<FakeApi>,
    Json(req): Json<AcceptFriendRequest>,
) -> Response {
    let mut store = api.store.lock().await;
    let pending = (req.friend_id.clone(), req.user_id.clone());
    if !store.friend_requests.remove(&pending) {
        return error(StatusCode::NOT_FOUND, "Friend request not found");
    }
    store.befriend(&req.user_id, &req.friend_id);
    Json(json!({ "success": true, "message": "Friend request accepted" })).into_response()
}

async fn list_friends(State(api): State<FakeApi>, Path(user_id): Path<String>) -> Json<Vec<User>> {
    let store = api.store.lock().await;
    let friends: Vec<User> = store
        .friends
        .get(&user_id)
        .map(|ids| {
            store
                .users
                .iter()
                .filter(|u| ids.contains(&u.id))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(friends)
}
