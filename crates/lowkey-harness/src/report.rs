//! Run summary

use std::time::Duration;

use tracing::info;

const RULE: &str = "============================================================";

/// Result of one case
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: &'static str,
    pub passed: bool,
    /// Error message when the case failed
    pub failure: Option<String>,
    pub elapsed: Duration,
}

/// Outcomes of a run, in the order the cases ran
#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<CaseOutcome>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Outcome of the case called `name`
    pub fn outcome(&self, name: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Percentage of passed cases; 0 for an empty report
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.passed() as f64 / self.total() as f64 * 100.0
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Summary lines: one per case, then totals
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![RULE.to_string(), "🏁 TEST SUMMARY".to_string(), RULE.to_string()];

        for outcome in &self.outcomes {
            lines.push(match (&outcome.failure, outcome.passed) {
                (_, true) => format!("{}: ✅ PASS", outcome.name),
                (Some(reason), false) => format!("{}: ❌ FAIL ({reason})", outcome.name),
                (None, false) => format!("{}: ❌ FAIL", outcome.name),
            });
        }

        lines.push(RULE.to_string());
        lines.push(format!("Total Tests: {}", self.total()));
        lines.push(format!("Passed: {}", self.passed()));
        lines.push(format!("Failed: {}", self.failed()));
        lines.push(format!("Success Rate: {:.1}%", self.success_rate()));
        lines
    }

    pub fn render(&self) -> String {
        self.summary_lines().join("\n")
    }

    /// Record the totals as one structured log event
    pub fn log_totals(&self) {
        info!(
            total = self.total(),
            passed = self.passed(),
            failed = self.failed(),
            "Run finished: {:.1}% passed",
            self.success_rate()
        );
    }
}
