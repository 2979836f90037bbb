//! Test helpers for integration tests
//!
//! Spawns the in-memory API on an ephemeral port and builds harness
//! configurations pointing at it.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use lowkey_common::HarnessConfig;
use lowkey_harness::TestContext;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fake_api::{DmFanout, FakeApi, Fault};

/// Fake API server that lives as long as the value
pub struct TestServer {
    pub addr: SocketAddr,
    pub api: FakeApi,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default delayed notification fan-out
    pub async fn start() -> Result<Self> {
        Self::start_with(FakeApi::default()).await
    }

    /// Start a server whose direct message notifications follow `fanout`
    pub async fn start_with_fanout(fanout: DmFanout) -> Result<Self> {
        Self::start_with(FakeApi::new(fanout)).await
    }

    /// Start a server that breaks `fault`
    pub async fn start_with_fault(fault: Fault) -> Result<Self> {
        Self::start_with(FakeApi::default().with_fault(fault)).await
    }

    pub async fn start_with(api: FakeApi) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let app = api.router();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { addr, api, handle })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Harness configuration with short timings, aimed at this server
    pub fn harness_config(&self) -> HarnessConfig {
        fast_config(self.base_url())
    }

    /// Fresh test context aimed at this server
    pub fn context(&self) -> Result<TestContext> {
        Ok(TestContext::new(self.harness_config())?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Harness configuration for `base_url` with timings suited to a local server
pub fn fast_config(base_url: impl Into<String>) -> HarnessConfig {
    HarnessConfig {
        request_timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(20),
        poll_timeout: Duration::from_millis(500),
        ..HarnessConfig::with_base_url(base_url)
    }
}

/// Address nothing is listening on
///
/// Binds an ephemeral port and releases it straight away.
pub async fn closed_port_url() -> Result<String> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
