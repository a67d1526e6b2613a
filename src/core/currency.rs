//! Upstream rate source abstraction

use crate::core::error::FetchError;
use crate::core::rates::LatestRates;
use async_trait::async_trait;

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Pivot currency every returned rate is expressed against.
    fn base_currency(&self) -> &str;

    /// Codes requested from upstream on each fetch.
    fn symbols(&self) -> &[String];

    async fn fetch_latest(&self) -> Result<LatestRates, FetchError>;
}
