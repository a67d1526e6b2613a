pub mod convert;
pub mod currencies;
pub mod rates;
pub mod setup;
pub mod status;
pub mod ui;
