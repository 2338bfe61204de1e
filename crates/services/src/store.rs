// Latest odds and signals per match, single writer with copy-on-read snapshots

use oracle_models::{Odds, Signal};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Point-in-time copy of the whole store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub odds: Vec<Odds>,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Default)]
struct StoreInner {
    odds: BTreeMap<String, Odds>,
    signals: BTreeMap<String, Signal>,
}

#[derive(Debug, Default)]
pub struct StateStore {
    inner: RwLock<StoreInner>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_odds(&self, record: Odds) {
        self.inner.write().odds.insert(record.match_id.clone(), record);
    }

    pub fn upsert_signal(&self, record: Signal) {
        self.inner.write().signals.insert(record.match_id.clone(), record);
    }

    /// Write one tick's results under a single lock acquisition so readers
    /// never see the odds of a tick without its signals.
    pub fn apply(&self, odds: Vec<Odds>, signals: Vec<Signal>) {
        let mut inner = self.inner.write();
        for record in odds {
            inner.odds.insert(record.match_id.clone(), record);
        }
        for record in signals {
            inner.signals.insert(record.match_id.clone(), record);
        }
    }

    /// Odds ordered by match id.
    pub fn snapshot_odds(&self) -> Vec<Odds> {
        self.inner.read().odds.values().cloned().collect()
    }

    /// Signals ordered by match id.
    pub fn snapshot_signals(&self) -> Vec<Signal> {
        self.inner.read().signals.values().cloned().collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        StoreSnapshot {
            odds: inner.odds.values().cloned().collect(),
            signals: inner.signals.values().cloned().collect(),
        }
    }

    pub fn odds_count(&self) -> usize {
        self.inner.read().odds.len()
    }

    pub fn signal_count(&self) -> usize {
        self.inner.read().signals.len()
    }
}
