//! Poll scheduler.
//!
//! Runs one poll cycle per tick of a fixed wall-clock timer. A cycle fans
//! out one task per source and finishes when every task has finished.
//! Cycles never overlap: when a cycle outlasts one or more ticks, a single
//! catch-up cycle starts as soon as it ends and the missed ticks are
//! skipped, keeping later ticks on the original grid.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::news::store::EntryStore;
use crate::news::types::CycleReport;

/// Polls one source and writes what it finds to the store.
#[async_trait]
pub trait SourcePoller: Send + Sync {
    /// Poll `source`, append its entries to `store` and return how many
    /// were stored. Failures are handled inside and yield zero.
    async fn poll(&self, source: &str, store: &dyn EntryStore) -> usize;
}

/// Periodic poll scheduler.
pub struct Scheduler {
    sources: Vec<String>,
    period: Duration,
    poller: Arc<dyn SourcePoller>,
    store: Arc<dyn EntryStore>,
    max_concurrent: Option<usize>,
    poll_on_startup: bool,
}

impl Scheduler {
    /// Create a scheduler polling every source once per `period`.
    pub fn new(
        sources: Vec<String>,
        period: Duration,
        poller: Arc<dyn SourcePoller>,
        store: Arc<dyn EntryStore>,
    ) -> Self {
        Self {
            sources,
            period,
            poller,
            store,
            max_concurrent: None,
            poll_on_startup: false,
        }
    }

    /// Create a scheduler from the loaded configuration.
    pub fn from_config(
        config: &Config,
        poller: Arc<dyn SourcePoller>,
        store: Arc<dyn EntryStore>,
    ) -> Self {
        let mut scheduler = Self::new(config.feeds.clone(), config.poll_period(), poller, store)
            .with_poll_on_startup(config.poll_on_startup);
        if let Some(limit) = config.fetch.max_concurrent {
            scheduler = scheduler.with_max_concurrent(limit);
        }
        scheduler
    }

    /// Limit how many sources are fetched at the same time.
    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = Some(limit.max(1));
        self
    }

    /// Run the first cycle immediately instead of one period after start.
    pub fn with_poll_on_startup(mut self, enabled: bool) -> Self {
        self.poll_on_startup = enabled;
        self
    }

    /// Get the poll period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Get the configured sources.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Run one poll cycle and wait for every source to finish.
    ///
    /// Each source runs in its own task, so a panicking or failing source
    /// does not affect the others. A source that never finishes keeps the
    /// cycle open.
    pub async fn run_cycle(&self) -> CycleReport {
        let semaphore = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for source in self.sources.iter().cloned() {
            let poller = Arc::clone(&self.poller);
            let store = Arc::clone(&self.store);
            let semaphore = semaphore.clone();

            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                poller.poll(&source, store.as_ref()).await
            });
        }

        let mut report = CycleReport {
            sources: self.sources.len(),
            entries: 0,
        };
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(count) => report.entries += count,
                Err(e) => error!("Poll task failed: {}", e),
            }
        }
        report
    }

    /// Run the scheduler until `shutdown` resolves.
    ///
    /// A cycle in progress when `shutdown` resolves is abandoned and its
    /// unfinished fetches are aborted.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            sources = self.sources.len(),
            "Scheduler started (period: {} seconds)",
            self.period.as_secs()
        );

        let start = if self.poll_on_startup {
            Instant::now()
        } else {
            Instant::now() + self.period
        };
        let mut timer = interval_at(start, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = timer.tick() => {}
            }

            debug!("Starting poll cycle");
            tokio::select! {
                _ = &mut shutdown => {
                    warn!("Shutdown during poll cycle, aborting in-flight fetches");
                    break;
                }
                report = self.run_cycle() => {
                    info!(
                        sources = report.sources,
                        entries = report.entries,
                        "Poll cycle finished"
                    );
                }
            }
        }

        info!("Scheduler stopped");
    }
}

/// Spawn the scheduler as a background task that stops on `shutdown`.
pub fn start_scheduler<F>(scheduler: Scheduler, shutdown: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        scheduler.run(shutdown).await;
    })
}
