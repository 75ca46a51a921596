//! Bounded retry for lost optimistic-concurrency races.

use std::future::Future;

use tracing::warn;

use crate::error::Result;

/// Run `attempt` until it succeeds, fails with anything other than a write
/// conflict, or has been retried `max_retries` times.
///
/// Each attempt must reload the aggregates it touches; a retry with stale
/// state would conflict again.
pub(crate) async fn with_conflict_retry<T, F, Fut>(
    operation: &'static str,
    max_retries: u32,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(e) if e.is_write_conflict() && retries < max_retries => {
                retries += 1;
                warn!(operation, retry = retries, error = %e, "Write conflict, reloading");
            }
            outcome => return outcome,
        }
    }
}
