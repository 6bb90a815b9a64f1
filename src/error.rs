// Error taxonomy for the aggregation pipeline.
//
// Only Configuration errors abort a run. Everything else is contained to
// the task that raised it: transient failures are retried a few times and
// then treated as zero-result, auth failures skip the source, parse
// failures skip the item. The pipeline always returns a best-effort
// corpus — an empty corpus is a valid result, not an error.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Classified failure from a collector or provider call.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// Timeout, 5xx, or rate limit — worth retrying with backoff.
    #[error("transient failure from {source_desc}: {message}")]
    Transient {
        source_desc: String,
        message: String,
    },

    /// Missing or rejected credentials. The source is skipped for the run.
    /// Named `platform` because thiserror reserves `source` for the cause
    /// chain.
    #[error("{platform} requires credentials that are missing or invalid")]
    AuthRequired { platform: String },

    /// A malformed item or response body. The item/batch member is skipped.
    #[error("parse failure: {message}")]
    Parse { message: String },

    /// Invalid run configuration. Fatal, raised before any network call.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CollectError {
    pub fn transient(source_desc: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            source_desc: source_desc.into(),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Classify a reqwest failure. Connection-level and timeout errors are
    /// transient; body-decode errors are parse failures.
    pub fn from_reqwest(source_desc: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::parse(format!("{source_desc}: {err}"))
        } else {
            Self::transient(source_desc, err.to_string())
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(source_desc: &str, status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            Self::AuthRequired {
                platform: source_desc.to_string(),
            }
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Self::transient(source_desc, format!("HTTP {status}"))
        } else {
            Self::parse(format!("{source_desc}: unexpected HTTP {status}"))
        }
    }
}

/// How many attempts `with_retry` makes before giving up.
pub const RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff between attempts; doubles each retry.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Run an async operation, retrying transient failures with doubling
/// backoff. Non-transient errors return immediately; after the attempt
/// budget is spent the last error is returned and the caller treats the
/// call as zero-result.
pub async fn with_retry<T, F, Fut>(desc: &str, mut op: F) -> Result<T, CollectError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectError>>,
{
    let mut delay = RETRY_BASE_DELAY;
    let mut last_err = None;

    for attempt in 1..=RETRY_ATTEMPTS {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < RETRY_ATTEMPTS => {
                warn!(
                    call = desc,
                    attempt,
                    error = %err,
                    "Transient failure, retrying after {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                last_err = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    // Unreachable with RETRY_ATTEMPTS >= 1, but keeps the types honest.
    Err(last_err.unwrap_or_else(|| CollectError::transient(desc, "retries exhausted")))
}
