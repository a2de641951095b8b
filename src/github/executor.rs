use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::github::client::GithubApi;
use crate::github::error::ApiError;
use crate::github::quota::{self, LOW_QUOTA_THRESHOLD};

/// Default attempt budget for a remote call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed backoff between retries of transient transport failures.
const TRANSIENT_BACKOFF: Duration = Duration::from_secs(5);

/// Run an idempotent remote operation with a quota pre-check and bounded
/// retry.
///
/// Each attempt first re-reads the quota and, when the window is nearly
/// spent, waits for the reset; that wait sits outside the retry budget.
/// Rate-limit and transient failures are recoverable by waiting, so they
/// retry. Every other failure is deterministic and propagates on the spot.
pub async fn execute<C, T, F, Fut>(client: &C, max_attempts: u32, op: F) -> Result<T, ApiError>
where
    C: GithubApi,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        if let Some(status) = quota::check_quota(client).await {
            if status.remaining < LOW_QUOTA_THRESHOLD {
                warn!("Approaching rate limit, waiting before next request");
                quota::wait_for_reset(client).await;
            }
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(ApiError::RateLimited(msg)) => {
                warn!(
                    "Rate limit error (attempt {}/{}): {}",
                    attempt, max_attempts, msg
                );
                if attempt >= max_attempts {
                    return Err(ApiError::RateLimitExceeded);
                }
                quota::wait_for_reset(client).await;
            }
            Err(ApiError::Transient(msg)) => {
                warn!(
                    "Temporary error ({}), retrying in {}s (attempt {}/{})",
                    msg,
                    TRANSIENT_BACKOFF.as_secs(),
                    attempt,
                    max_attempts
                );
                if attempt >= max_attempts {
                    return Err(ApiError::Transient(msg));
                }
                tokio::time::sleep(TRANSIENT_BACKOFF).await;
            }
            Err(other) => return Err(other),
        }
    }
}
