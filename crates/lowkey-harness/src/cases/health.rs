//! Liveness checks

use async_trait::async_trait;
use lowkey_common::HarnessResult;
use tracing::info;

use super::{expect, Case};
use crate::context::TestContext;

/// GET / answers with a banner message and GET /health reports healthy
pub struct HealthCheck;

#[async_trait]
impl Case for HealthCheck {
    fn name(&self) -> &'static str {
        "health_check"
    }

    async fn run(&self, ctx: &mut TestContext) -> HarnessResult<()> {
        let root = ctx.client().get("/").await?.value()?;
        let banner = expect::str_field(&root, "message")?;
        info!(banner, "Root endpoint working");

        let health = ctx.client().get("/health").await?.value()?;
        expect::equal("health status", expect::str_field(&health, "status")?, "healthy")?;
        info!("Health endpoint working");
        Ok(())
    }
}
