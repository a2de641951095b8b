use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

use crate::github::client::GithubApi;
use crate::github::types::QuotaStatus;

/// Remaining-request floor below which the executor waits before issuing
/// the next request.
pub const LOW_QUOTA_THRESHOLD: u64 = 10;

/// Remaining-request floor below which `log_quota` warns.
const LOW_QUOTA_WARN_THRESHOLD: u64 = 100;

/// Whether the window is spent enough to be worth a warning.
fn quota_is_low(status: &QuotaStatus) -> bool {
    status.remaining < LOW_QUOTA_WARN_THRESHOLD
}

/// Fetch the current rate-limit snapshot. Transport failure is logged and
/// swallowed; a missing snapshot must never block the pipeline.
pub async fn check_quota<C: GithubApi>(client: &C) -> Option<QuotaStatus> {
    match client.quota().await {
        Ok(status) => Some(status),
        Err(e) => {
            warn!("Could not check rate limit: {}", e);
            None
        }
    }
}

/// Whole minutes until the quota window resets, rounded up. Zero once the
/// reset time has passed.
pub fn minutes_until_reset(status: &QuotaStatus) -> i64 {
    let secs = (status.reset_at - Utc::now()).num_seconds().max(0);
    (secs + 59) / 60
}

/// Sleep until the quota window resets, plus a one-minute buffer. The
/// status is re-read here rather than passed in: the quota is shared,
/// process-wide state and may have changed since the caller looked. Only
/// sleeps when the fresh read reports zero remaining requests.
pub async fn wait_for_reset<C: GithubApi>(client: &C) {
    let Some(status) = check_quota(client).await else {
        return;
    };
    if status.remaining > 0 {
        return;
    }

    let wait_minutes = minutes_until_reset(&status) + 1;
    info!(
        "Rate limit exceeded. Waiting {} minutes until reset at {}",
        wait_minutes, status.reset_at
    );
    tokio::time::sleep(Duration::from_secs(wait_minutes as u64 * 60)).await;
    info!("Rate limit reset. Resuming");
}

/// Log the current remaining/limit, warning when the window is nearly spent.
pub async fn log_quota<C: GithubApi>(client: &C, prefix: &str) {
    if let Some(status) = check_quota(client).await {
        info!(
            "{}rate limit: {}/{} remaining",
            prefix, status.remaining, status.limit
        );
        if quota_is_low(&status) {
            warn!(
                "Low rate limit! Resets in {} minutes",
                minutes_until_reset(&status)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_minutes_until_reset_rounds_up() {
        let status = QuotaStatus {
            remaining: 0,
            limit: 5000,
            reset_at: Utc::now() + ChronoDuration::seconds(150),
        };
        assert_eq!(minutes_until_reset(&status), 3);
    }

    #[tokio::test]
    async fn test_check_quota_swallows_transport_failure() {
        let client = crate::github::testing::FakeClient::with_broken_quota();
        assert!(check_quota(&client).await.is_none());
    }

    #[test]
    fn test_quota_is_low_below_one_hundred() {
        let status = |remaining| QuotaStatus {
            remaining,
            limit: 5000,
            reset_at: Utc::now() + ChronoDuration::hours(1),
        };
        assert!(quota_is_low(&status(0)));
        assert!(quota_is_low(&status(99)));
        assert!(!quota_is_low(&status(100)));
        assert!(!quota_is_low(&status(5000)));
    }

    #[test]
    fn test_minutes_until_reset_past_is_zero() {
        let status = QuotaStatus {
            remaining: 0,
            limit: 5000,
            reset_at: Utc::now() - ChronoDuration::minutes(5),
        };
        assert_eq!(minutes_until_reset(&status), 0);
    }
}
