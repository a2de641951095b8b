use thiserror::Error;

/// Wire-level failure taxonomy for GitHub API calls. The executor's retry
/// decisions hang off these variants.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 403 carrying a rate-limit indicator. Recoverable by waiting for the
    /// quota window to reset.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Surfaced in place of the underlying cause once rate-limit retries
    /// are exhausted.
    #[error("rate limit exceeded and max retries reached")]
    RateLimitExceeded,

    /// 5xx, timeout, or connection reset. Recoverable by a short backoff.
    #[error("temporary error: {0}")]
    Transient(String),

    /// Deterministic failure (bad query, auth, not found). Retrying would
    /// only waste the attempt budget.
    #[error("{0}")]
    NonRetryable(String),
}

impl ApiError {
    /// Classify an octocrab failure. GitHub replies carry a status code and
    /// message; transport-level failures are sniffed from the error text the
    /// way timeouts and resets surface there.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        if let octocrab::Error::GitHub { ref source, .. } = err {
            let status = source.status_code.as_u16();
            let message = source.message.clone();
            if status == 403 && message.to_lowercase().contains("rate limit") {
                return ApiError::RateLimited(message);
            }
            if (500..600).contains(&status) {
                return ApiError::Transient(format!("HTTP {}: {}", status, message));
            }
            return ApiError::NonRetryable(format!("HTTP {}: {}", status, message));
        }

        let debug = format!("{:?}", err).to_lowercase();
        if debug.contains("timed out")
            || debug.contains("timeout")
            || debug.contains("connection reset")
            || debug.contains("connectionreset")
        {
            ApiError::Transient(err.to_string())
        } else {
            ApiError::NonRetryable(err.to_string())
        }
    }
}
