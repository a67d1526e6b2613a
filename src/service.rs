//! Cached access to the upstream rate table.
//!
//! [`ExchangeRateService`] keeps the most recent [`CacheRecord`] in memory and
//! mirrors it into a [`KeyValueStore`] so a restarted process can reuse it.
//! A record younger than the TTL is served without I/O. Once it expires the
//! next call refetches; if that fetch fails, the expired record is served
//! instead and callers can spot the staleness through `fetched_at_ms` or
//! [`ExchangeRateService::cache_status`].

use crate::core::{
    CacheRecord, CacheStatus, Clock, KeyValueStore, RateError, RateSnapshot, RateSource,
    StoreError, SystemClock,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Key of the persisted [`CacheRecord`].
pub const CACHE_KEY: &str = "exchange_rates_cache";

pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

pub struct ExchangeRateService {
    source: Arc<dyn RateSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    record: Mutex<Option<CacheRecord>>,
    // Held for the duration of an upstream fetch so concurrent misses share one request.
    refresh: Mutex<()>,
}

impl ExchangeRateService {
    pub fn new(source: Arc<dyn RateSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(source, store, Arc::new(SystemClock), DEFAULT_TTL)
    }

    pub fn with_clock(
        source: Arc<dyn RateSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            record: Mutex::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub fn base_currency(&self) -> &str {
        self.source.base_currency()
    }

    /// Returns the current rate table, fetching it when the cached one has expired.
    pub async fn get_rates(&self) -> Result<RateSnapshot, RateError> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let _refresh = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(snapshot) = self.fresh_snapshot().await {
            debug!("Rates refreshed by a concurrent caller");
            return Ok(snapshot);
        }

        match self.source.fetch_latest().await {
            Ok(latest) => {
                let now = self.clock.now_ms();
                let snapshot = RateSnapshot::from_latest(latest, now);
                let record = CacheRecord {
                    snapshot: snapshot.clone(),
                    cached_at_ms: now,
                };
                info!(
                    base = %snapshot.base,
                    date = %snapshot.date,
                    "Fetched new exchange rates"
                );
                self.persist(&record).await;
                *self.record.lock().await = Some(record);
                Ok(snapshot)
            }
            Err(err) => {
                let fallback = self.record.lock().await.clone();
                match fallback {
                    Some(record) => {
                        warn!(
                            error = %err,
                            cached_at_ms = record.cached_at_ms,
                            "Failed to fetch new rates, using cached data"
                        );
                        Ok(record.snapshot)
                    }
                    None => Err(err.into()),
                }
            }
        }
    }

    /// Converts `amount` from one currency to another through the snapshot's base.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError> {
        if from == to {
            return Ok(amount);
        }
        let snapshot = self.get_rates().await?;
        snapshot.convert(amount, from, to)
    }

    /// The base currency plus every currency in the current rate table.
    pub async fn supported_currencies(&self) -> Result<BTreeSet<String>, RateError> {
        Ok(self.get_rates().await?.currencies())
    }

    /// Freshness of the cached record. Never triggers a fetch.
    pub async fn cache_status(&self) -> CacheStatus {
        let mut guard = self.record.lock().await;
        if guard.is_none() {
            *guard = self.load().await;
        }
        match guard.as_ref() {
            Some(record) => CacheStatus {
                is_fresh: record.is_fresh(self.clock.now_ms(), self.ttl_ms),
                cached_at_ms: Some(record.cached_at_ms),
                expires_at_ms: Some(record.cached_at_ms.saturating_add(self.ttl_ms)),
            },
            None => CacheStatus::empty(),
        }
    }

    /// Whatever snapshot is held, fresh or not. Never triggers a fetch.
    pub async fn cached_snapshot(&self) -> Option<RateSnapshot> {
        let mut guard = self.record.lock().await;
        if guard.is_none() {
            *guard = self.load().await;
        }
        guard.as_ref().map(|record| record.snapshot.clone())
    }

    /// Returns the held snapshot if it is within the TTL, adopting the
    /// persisted record first when memory is empty.
    async fn fresh_snapshot(&self) -> Option<RateSnapshot> {
        let mut guard = self.record.lock().await;
        if guard.is_none() {
            *guard = self.load().await;
        }
        let now = self.clock.now_ms();
        match guard.as_ref() {
            Some(record) if record.is_fresh(now, self.ttl_ms) => {
                debug!("Rate cache HIT");
                Some(record.snapshot.clone())
            }
            Some(_) => {
                debug!("Rate cache EXPIRED");
                None
            }
            None => {
                debug!("Rate cache MISS");
                None
            }
        }
    }

    async fn load(&self) -> Option<CacheRecord> {
        match self.read_record().await {
            Ok(Some(record)) if record.cached_at_ms > self.clock.now_ms() => {
                warn!(
                    cached_at_ms = record.cached_at_ms,
                    "Ignoring rate cache stamped in the future"
                );
                None
            }
            Ok(Some(record)) => {
                debug!(cached_at_ms = record.cached_at_ms, "Loaded rate cache from store");
                Some(record)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable rate cache in store");
                None
            }
        }
    }

    async fn read_record(&self) -> Result<Option<CacheRecord>, StoreError> {
        match self.store.get(CACHE_KEY).await? {
            Some(stored) => Ok(Some(serde_json::from_str(&stored)?)),
            None => Ok(None),
        }
    }

    async fn persist(&self, record: &CacheRecord) {
        if let Err(e) = self.write_record(record).await {
            warn!(error = %e, "Failed to save rate cache to store");
        }
    }

    async fn write_record(&self, record: &CacheRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)?;
        self.store.set(CACHE_KEY, &payload).await
    }
}
