//! Rate table types and pivot-based conversion

use crate::core::error::RateError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Validated payload returned by a [`crate::core::RateSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct LatestRates {
    pub base: String,
    pub date: String,
    pub rates: HashMap<String, f64>,
}

/// Rates relative to `base`, i.e. one unit of `base` buys `rates[code]` units of `code`.
///
/// `base` itself is never a key of `rates`; its rate is implicitly 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: String,
    pub date: String,
    pub rates: HashMap<String, f64>,
    pub fetched_at_ms: i64,
}

impl RateSnapshot {
    pub fn from_latest(latest: LatestRates, fetched_at_ms: i64) -> Self {
        Self {
            base: latest.base,
            date: latest.date,
            rates: latest.rates,
            fetched_at_ms,
        }
    }

    /// Rate of `code` against the base. Zero, negative and non-finite rates count as missing.
    pub fn rate(&self, code: &str) -> Result<f64, RateError> {
        if code == self.base {
            return Ok(1.0);
        }
        self.rates
            .get(code)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| RateError::RateNotFound(code.to_string()))
    }

    /// Converts `amount` by triangulating through the base currency. No rounding is applied.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError> {
        if from == to {
            return Ok(amount);
        }
        if from == self.base {
            return Ok(amount * self.rate(to)?);
        }
        if to == self.base {
            return Ok(amount / self.rate(from)?);
        }
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        Ok((amount / from_rate) * to_rate)
    }

    /// The base plus every code in the rate table.
    pub fn currencies(&self) -> BTreeSet<String> {
        std::iter::once(self.base.clone())
            .chain(self.rates.keys().cloned())
            .collect()
    }
}

/// A snapshot together with the time it entered the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub snapshot: RateSnapshot,
    pub cached_at_ms: i64,
}

impl CacheRecord {
    /// A record stamped after `now_ms`, or too far back to measure, is never fresh.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms
            .checked_sub(self.cached_at_ms)
            .is_some_and(|age| (0..ttl_ms).contains(&age))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub is_fresh: bool,
    pub cached_at_ms: Option<i64>,
    pub expires_at_ms: Option<i64>,
}

impl CacheStatus {
    pub fn empty() -> Self {
        Self {
            is_fresh: false,
            cached_at_ms: None,
            expires_at_ms: None,
        }
    }
}
