use crate::adapters::http::AvailabilityClient;
use crate::core::checker::AvailabilityChecker;
use crate::core::generator::NumberGenerator;
use crate::core::state::ScanState;
use crate::domain::model::{CheckOutcome, FixedPositions, ScanSummary};
use crate::domain::ports::{ConfigProvider, ResultSink};
use crate::utils::error::{Result, ScanError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// What a run would cover, without touching the network.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub base_prefix: String,
    pub fixed_positions: FixedPositions,
    pub candidate_count: u64,
    pub first_candidate: Option<String>,
    pub last_candidate: Option<String>,
    pub workers: usize,
}

pub struct ScanEngine<S: ResultSink + 'static> {
    generator: NumberGenerator,
    checker: Arc<AvailabilityChecker<S>>,
    sink: Arc<S>,
    workers: usize,
}

impl<S: ResultSink + 'static> ScanEngine<S> {
    pub fn new(config: &impl ConfigProvider, sink: S) -> Result<Self> {
        let fixed = FixedPositions::new(config.fixed_digits())?;
        let generator = NumberGenerator::new(config.base_prefix(), fixed);
        let policy = config.retry_policy();
        let client = AvailabilityClient::new(
            config.api_endpoint(),
            config.brand(),
            config.sim_category(),
            policy.request_timeout,
        )?;
        let sink = Arc::new(sink);
        let checker = AvailabilityChecker::new(
            client,
            Arc::new(ScanState::new()),
            Arc::clone(&sink),
            policy,
        );

        Ok(Self {
            generator,
            checker: Arc::new(checker),
            sink,
            workers: config.workers().max(1),
        })
    }

    pub fn generator(&self) -> &NumberGenerator {
        &self.generator
    }

    pub fn state(&self) -> &Arc<ScanState> {
        self.checker.state()
    }

    pub fn plan(&self) -> ScanPlan {
        ScanPlan {
            base_prefix: self.generator.base_prefix().to_string(),
            fixed_positions: self.generator.fixed_positions().clone(),
            candidate_count: self.generator.candidate_count(),
            first_candidate: self.generator.iter().next(),
            last_candidate: self.generator.iter().last(),
            workers: self.workers,
        }
    }

    pub async fn run(&self) -> Result<ScanSummary> {
        let started = Instant::now();
        tracing::info!("🚀 Starting number check with {} workers", self.workers);
        tracing::info!("📞 Base number: {}", self.generator.base_prefix());
        tracing::info!("📌 Fixed positions: {}", self.generator.fixed_positions());
        tracing::info!(
            "🔢 Candidates to check: {}",
            self.generator.candidate_count()
        );

        self.initial_pass().await?;
        self.drain_retry_queue().await?;

        let state = self.state();
        let summary = ScanSummary {
            total_candidates: self.generator.candidate_count(),
            checked: state.checked_len(),
            already_known: state.already_known(),
            available: state.available(),
            unresolved: state.retry_snapshot(),
            output_path: self.sink.location(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "🏁 Search completed in {:?}: found {}, checked {}, unresolved {}",
            summary.elapsed,
            summary.found(),
            summary.checked,
            summary.unresolved.len()
        );
        Ok(summary)
    }

    /// Every candidate once, at most `workers` checks in flight.
    async fn initial_pass(&self) -> Result<()> {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for number in self.generator.iter() {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| ScanError::WorkerError {
                    message: e.to_string(),
                })?;
            let checker = Arc::clone(&self.checker);
            tasks.spawn(async move {
                let _permit = permit;
                checker.check(&number).await
            });

            // 回收已完成的任務，避免結果在 JoinSet 中累積
            while let Some(joined) = tasks.try_join_next() {
                settle_task(joined)?;
            }
        }

        while let Some(joined) = tasks.join_next().await {
            settle_task(joined)?;
        }

        tracing::info!(
            "📊 Initial pass done: {} checked, {} waiting for retry",
            self.state().checked_len(),
            self.state().retry_len()
        );
        Ok(())
    }

    /// Up to `drain_passes` sequential sweeps over the retry queue.
    async fn drain_retry_queue(&self) -> Result<()> {
        let policy = self.checker.policy();
        let state = self.state();

        let mut pass = 0;
        while pass < policy.drain_passes && state.retry_len() > 0 {
            if pass > 0 {
                tokio::time::sleep(policy.drain_cooldown).await;
            }
            pass += 1;

            let pending = state.retry_len();
            tracing::info!(
                "🔁 Processing retry queue, pass {}/{} ({} numbers)",
                pass,
                policy.drain_passes,
                pending
            );

            for _ in 0..pending {
                let Some(number) = state.pop_retry() else {
                    break;
                };
                if state.is_checked(&number) {
                    continue;
                }
                self.checker.check(&number).await?;
            }
        }

        let unresolved = state.retry_len();
        if unresolved > 0 {
            tracing::warn!(
                "⚠️ {} numbers could not be checked after {} retry passes",
                unresolved,
                pass
            );
        }
        Ok(())
    }
}

fn settle_task(joined: std::result::Result<Result<CheckOutcome>, JoinError>) -> Result<()> {
    match joined {
        Ok(outcome) => outcome.map(|_| ()),
        Err(e) => Err(ScanError::WorkerError {
            message: e.to_string(),
        }),
    }
}
