//! Integration test utilities for the LowKey harness
//!
//! This crate runs the harness against an in-memory implementation of the
//! LowKey API so its cases can be checked without a live deployment.

pub mod fake_api;
pub mod helpers;

pub use fake_api::{DmFanout, FakeApi, Fault};
pub use helpers::*;
