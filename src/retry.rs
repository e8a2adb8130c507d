use std::time::Duration;

use crate::transport::{HttpResponse, NetworkError, Timer, Transport};
use crate::wire::GenerateContentRequest;

/// How many times a request is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt with the given zero-based index:
    /// `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("request rejected with status {status}")]
    Rejected { status: u16 },
    #[error("request failed after {attempts} attempts (last status {last_status})")]
    Exhausted { attempts: u32, last_status: u16 },
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Sends `body` until it succeeds at the transport level or the policy runs out.
///
/// Only rate limiting, server errors and network errors are retried; any
/// other unsuccessful status ends the loop at once. A success status ends
/// it regardless of what the body contains. A retryable status always waits
/// `2^attempt` base delays, the last attempt included; a network error on
/// the last attempt is returned without waiting.
///
/// # Errors
/// * [`TransportFailure::Rejected`] for a non-retryable status.
/// * [`TransportFailure::Network`] when the final attempt produced no response.
/// * [`TransportFailure::Exhausted`] when the final attempt was rate limited or a server error.
pub async fn send_with_retry<T, S>(
    transport: &T,
    timer: &S,
    policy: &RetryPolicy,
    url: &str,
    body: &GenerateContentRequest,
) -> Result<HttpResponse, TransportFailure>
where
    T: Transport,
    S: Timer,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_status = 0;

    for attempt in 0..attempts {
        let is_last = attempt + 1 == attempts;

        match transport.post(url, body).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) if response.is_retryable() => {
                last_status = response.status;
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "attempt {} of {} failed with status {}, waiting {:?}",
                    attempt + 1,
                    attempts,
                    response.status,
                    delay
                );
                timer.sleep(delay).await;
            }
            Ok(response) => {
                return Err(TransportFailure::Rejected {
                    status: response.status,
                });
            }
            Err(error) => {
                if is_last {
                    return Err(error.into());
                }
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "attempt {} failed: {}, retrying in {:?}",
                    attempt + 1,
                    error,
                    delay
                );
                timer.sleep(delay).await;
            }
        }
    }

    Err(TransportFailure::Exhausted {
        attempts,
        last_status,
    })
}
