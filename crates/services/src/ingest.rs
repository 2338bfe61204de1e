use crate::broadcaster::{BroadcastReport, Broadcaster};
use crate::error::FeedError;
use crate::normalizer::normalize_records;
use crate::odds_feed::OddsProvider;
use crate::signals::SignalEvaluator;
use crate::store::StateStore;
use oracle_models::{LiveMessage, Signal};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub poll_interval: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// What one completed tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub upstream_records: usize,
    pub odds_stored: usize,
    pub signals_raised: usize,
    pub broadcast: BroadcastReport,
}

/// Drives fetch, normalize, evaluate, store and broadcast on a fixed cadence.
#[derive(Clone)]
pub struct IngestService {
    provider: Arc<dyn OddsProvider>,
    store: Arc<StateStore>,
    broadcaster: Broadcaster,
    evaluator: SignalEvaluator,
    config: IngestConfig,
}

impl IngestService {
    pub fn new(
        provider: Arc<dyn OddsProvider>,
        store: Arc<StateStore>,
        broadcaster: Broadcaster,
        config: IngestConfig,
    ) -> Self {
        Self {
            provider,
            store,
            broadcaster,
            evaluator: SignalEvaluator::default(),
            config,
        }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Run ticks until `shutdown` is cancelled. A failed tick is logged and
    /// retried on the next interval.
    pub async fn run(&self, shutdown: CancellationToken) {
        tracing::info!("🎯 Starting ingest loop");
        tracing::info!("⚙️  Poll interval: {:?}", self.config.poll_interval);
        tracing::info!("📡 Provider: {}", self.provider.name());

        let mut ticks: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = self.tick() => {
                    ticks += 1;
                    match result {
                        Ok(report) => tracing::debug!(
                            "📊 Tick #{}: {} odds, {} new signals, {}/{} subscribers reached, {} pruned",
                            ticks,
                            report.odds_stored,
                            report.signals_raised,
                            report.broadcast.delivered,
                            report.broadcast.attempted,
                            report.broadcast.pruned,
                        ),
                        Err(e) => tracing::warn!("❌ Tick #{} skipped ({}): {}", ticks, e.kind(), e),
                    }
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = sleep(self.config.poll_interval) => {}
            }
        }

        tracing::info!("🛑 Ingest loop stopped after {} ticks", ticks);
    }

    /// Execute one fetch-normalize-store-broadcast cycle.
    pub async fn tick(&self) -> Result<TickReport, FeedError> {
        let records = self.provider.fetch().await?;

        let odds = normalize_records(&records);
        let signals: Vec<Signal> = odds.iter().filter_map(|o| self.evaluator.evaluate(o)).collect();

        let report = TickReport {
            upstream_records: records.len(),
            odds_stored: odds.len(),
            signals_raised: signals.len(),
            broadcast: BroadcastReport::default(),
        };

        self.store.apply(odds, signals);

        let snapshot = self.store.snapshot();
        let message = LiveMessage::odds_update(snapshot.odds, snapshot.signals);
        let broadcast = self.broadcaster.broadcast(&message);

        Ok(TickReport { broadcast, ..report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcaster::{SubscriberHandle, SubscriberRegistry};
    use crate::odds_feed::DemoOddsProvider;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails every other call.
    struct FlakyProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OddsProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn fetch(&self) -> Result<Vec<Value>, FeedError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Err(FeedError::Status { status: 503 })
            } else {
                DemoOddsProvider.fetch().await
            }
        }
    }

    fn service(provider: Arc<dyn OddsProvider>, interval: Duration) -> (IngestService, Arc<SubscriberRegistry>) {
        let registry = Arc::new(SubscriberRegistry::new());
        let service = IngestService::new(
            provider,
            Arc::new(StateStore::new()),
            Broadcaster::new(registry.clone()),
            IngestConfig { poll_interval: interval },
        );
        (service, registry)
    }

    #[tokio::test]
    async fn test_demo_tick() {
        let (service, registry) = service(Arc::new(DemoOddsProvider), Duration::from_secs(5));
        let (handle, mut rx) = SubscriberHandle::channel(4);
        registry.register(handle);

        let report = service.tick().await.unwrap();
        assert_eq!(report.upstream_records, 2);
        assert_eq!(report.odds_stored, 2);
        assert_eq!(report.signals_raised, 1);
        assert_eq!(report.broadcast.delivered, 1);

        let message: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(message["type"], "odds_update");
        assert_eq!(message["odds"].as_array().unwrap().len(), 2);
        assert_eq!(message["signals"][0]["match_id"], "m2");
    }

    #[tokio::test]
    async fn test_failed_tick_leaves_store_untouched() {
        let provider = Arc::new(FlakyProvider { calls: AtomicUsize::new(0) });
        let (service, _registry) = service(provider, Duration::from_secs(5));

        let err = service.tick().await.unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 503 }));
        assert_eq!(service.store().odds_count(), 0);

        service.tick().await.unwrap();
        assert_eq!(service.store().odds_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_survives_failures_and_stops_on_cancel() {
        let provider = Arc::new(FlakyProvider { calls: AtomicUsize::new(0) });
        let (service, _registry) = service(provider.clone(), Duration::from_secs(5));
        let shutdown = CancellationToken::new();

        let task = {
            let service = service.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move { service.run(shutdown).await })
        };

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(service.store().odds_count(), 2);

        shutdown.cancel();
        task.await.unwrap();
    }
}
