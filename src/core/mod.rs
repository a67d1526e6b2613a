//! Core types and ports for rate acquisition

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use cache::KeyValueStore;
pub use clock::{Clock, ManualClock, SystemClock};
pub use currency::RateSource;
pub use error::{FetchError, RateError, StoreError};
pub use rates::{CacheRecord, CacheStatus, LatestRates, RateSnapshot};
