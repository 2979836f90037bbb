//! Test orchestrator
//!
//! Runs the cases one after another against a single context. A failing
//! case is recorded and the run moves on. Printing the summary is left to
//! the caller so it does not depend on the log filter.

use tokio::time::Instant;
use tracing::{error, info, info_span, Instrument};

use crate::cases::{all_cases, Case};
use crate::context::TestContext;
use crate::report::{CaseOutcome, Report};

/// Sequential runner over an ordered list of cases
pub struct Orchestrator {
    ctx: TestContext,
    cases: Vec<Box<dyn Case>>,
}

impl Orchestrator {
    /// Orchestrator over the full case list
    pub fn new(ctx: TestContext) -> Self {
        Self::with_cases(ctx, all_cases())
    }

    /// Orchestrator over a custom case list
    pub fn with_cases(ctx: TestContext, cases: Vec<Box<dyn Case>>) -> Self {
        Self { ctx, cases }
    }

    pub fn context(&self) -> &TestContext {
        &self.ctx
    }

    /// Run every case in order
    pub async fn run(&mut self) -> Report {
        info!("🚀 Starting LowKey Backend API Tests");
        info!(base_url = %self.ctx.client().base_url(), "Base URL: {}", self.ctx.client().base_url());

        let mut report = Report::new();
        for case in &self.cases {
            report.record(run_case(&mut self.ctx, case.as_ref()).await);
        }

        report.log_totals();
        report
    }
}

/// Run one case, turning its result into an outcome
pub async fn run_case(ctx: &mut TestContext, case: &dyn Case) -> CaseOutcome {
    let name = case.name();
    let span = info_span!("case", case = name);

    async move {
        info!("=== Testing {name} ===");
        let started = Instant::now();
        let result = case.run(ctx).await;
        let elapsed = started.elapsed();

        match result {
            Ok(()) => {
                info!(elapsed_ms = elapsed.as_millis() as u64, "✅ {name} passed");
                CaseOutcome {
                    name,
                    passed: true,
                    failure: None,
                    elapsed,
                }
            }
            Err(e) => {
                error!(
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "❌ {name} failed"
                );
                CaseOutcome {
                    name,
                    passed: false,
                    failure: Some(e.to_string()),
                    elapsed,
                }
            }
        }
    }
    .instrument(span)
    .await
}
