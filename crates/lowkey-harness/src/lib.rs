//! # lowkey-harness
//!
//! Black-box integration harness for the LowKey messaging API.
//!
//! A run registers throwaway accounts, walks them through auth, user,
//! conversation, messaging, notification and friend workflows, and prints
//! a pass/fail summary. Fixtures created along the way are shared through
//! an explicit [`TestContext`] and addressed by role.

pub mod cases;
pub mod client;
pub mod context;
pub mod fixtures;
pub mod orchestrator;
pub mod poll;
pub mod report;

// Re-export commonly used types at crate root
pub use cases::{all_cases, Case};
pub use client::{ApiClient, ApiResponse};
pub use context::TestContext;
pub use fixtures::{ConversationFixture, ConversationRole, FixtureRegistry, UserFixture, UserRole};
pub use orchestrator::{run_case, Orchestrator};
pub use poll::poll_until;
pub use report::{CaseOutcome, Report};
