//! Bounded polling for side effects the API applies asynchronously

use std::future::Future;
use std::time::Duration;

use lowkey_common::{HarnessError, HarnessResult};
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Probe until it yields a value or `timeout` elapses
///
/// The first probe runs immediately; later probes are spaced by `interval`.
/// `Ok(None)` from the probe means "not yet". An error from the probe ends
/// the poll at once.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    interval: Duration,
    timeout: Duration,
    mut probe: F,
) -> HarnessResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HarnessResult<Option<T>>>,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if let Some(value) = probe().await? {
            debug!(what, attempts, "Condition met");
            return Ok(value);
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(HarnessError::Timeout {
                what: what.to_string(),
                waited_ms: elapsed.as_millis(),
            });
        }

        debug!(what, attempts, "Condition not met yet");
        sleep(interval.min(timeout - elapsed)).await;
    }
}
