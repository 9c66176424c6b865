use crate::adapters::http::AvailabilityClient;
use crate::core::state::{MarkResult, ScanState};
use crate::domain::model::{CheckOutcome, RetryPolicy};
use crate::domain::ports::ResultSink;
use crate::utils::error::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Checks one candidate at a time against the availability API.
///
/// Only a failure to record a found number is returned as an error;
/// request failures are retried and then parked in the retry queue.
pub struct AvailabilityChecker<S: ResultSink> {
    client: AvailabilityClient,
    state: Arc<ScanState>,
    sink: Arc<S>,
    policy: RetryPolicy,
}

impl<S: ResultSink> AvailabilityChecker<S> {
    pub fn new(
        client: AvailabilityClient,
        state: Arc<ScanState>,
        sink: Arc<S>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            state,
            sink,
            policy,
        }
    }

    pub fn state(&self) -> &Arc<ScanState> {
        &self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn check(&self, number: &str) -> Result<CheckOutcome> {
        let mut attempts = 0;
        while attempts < self.policy.max_attempts {
            if self.state.note_if_known(number) {
                tracing::debug!("⏭️ Already checked: {}", number);
                return Ok(CheckOutcome::AlreadyKnown);
            }

            tokio::time::sleep(self.jitter()).await;

            match self.client.query(number).await {
                Ok(available) => return self.settle(number, available).await,
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        "⚠️ Error checking {} (attempt {}/{}): {}",
                        number,
                        attempts,
                        self.policy.max_attempts,
                        e
                    );
                    // 最後一次失敗後直接進入重試佇列，不再等待
                    if attempts < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        if self.state.enqueue_retry(number) {
            tracing::debug!("🔁 Queued for retry: {}", number);
        }
        Ok(CheckOutcome::Deferred)
    }

    async fn settle(&self, number: &str, available: bool) -> Result<CheckOutcome> {
        if self.state.mark_checked(number, available) == MarkResult::Duplicate {
            tracing::debug!("⏭️ Already checked by another worker: {}", number);
            return Ok(CheckOutcome::AlreadyKnown);
        }

        if available {
            tracing::info!("✅ Found available number: {}", number);
            self.sink.record(number).await?;
            Ok(CheckOutcome::Available)
        } else {
            tracing::info!("❌ Number not available: {}", number);
            Ok(CheckOutcome::Unavailable)
        }
    }

    fn jitter(&self) -> Duration {
        let (min, max) = (self.policy.jitter_min, self.policy.jitter_max);
        if max <= min {
            return min;
        }
        rand::rng().random_range(min..=max)
    }
}
