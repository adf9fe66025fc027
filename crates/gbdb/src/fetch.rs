//! Byte retrieval for listings and archives.

use std::time::Duration;

use tracing::{error, warn};

use crate::{error::FetchError, pool::CancelToken};

/// Largest response body accepted; the biggest GB/GBC archives are a few MiB.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Anything that can turn a URL into bytes.
pub trait Source: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP(S) source backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct HttpSource {
    agent: ureq::Agent,
    max_body: u64,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            max_body: MAX_BODY_BYTES,
        }
    }
}

impl Source for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::StatusCode(status) => FetchError::Status {
                url: url.to_owned(),
                status,
            },
            other => FetchError::Transport {
                url: url.to_owned(),
                reason: other.to_string(),
            },
        })?;

        response
            .body_mut()
            .with_config()
            .limit(self.max_body)
            .read_to_vec()
            .map_err(|err| match err {
                ureq::Error::BodyExceedsLimit(limit) => FetchError::TooLarge {
                    url: url.to_owned(),
                    limit,
                },
                other => FetchError::Transport {
                    url: url.to_owned(),
                    reason: other.to_string(),
                },
            })
    }
}

/// How often and how patiently a failed download is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Retry `n` waits `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Fetch `url`, retrying failures according to `policy`.
///
/// `label` names the download in log messages.
pub fn fetch_with_retry(
    source: &dyn Source,
    url: &str,
    label: &str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Vec<u8>, FetchError> {
    let mut retries = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let err = match source.fetch(url) {
            Ok(bytes) => return Ok(bytes),
            Err(err) => err,
        };

        if retries >= policy.retries {
            error!(
                "Error downloading {label}: {err}, giving up after {} retries",
                policy.retries
            );
            return Err(err);
        }

        retries += 1;
        warn!(
            "Error downloading {label}: {err}, retrying ({retries}/{})",
            policy.retries
        );
        if !cancel.sleep(policy.backoff * retries) {
            return Err(FetchError::Cancelled);
        }
    }
}
