pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::config::AppConfig;
use crate::service::ExchangeRateService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert { amount: f64, from: String, to: String },
    Rates,
    Currencies { query: Option<String> },
    Status,
}

/// Builds a service wired to the configured provider and on-disk store.
pub fn build_service(config: &AppConfig) -> ExchangeRateService {
    let source = Arc::new(providers::ExchangeRatesApiProvider::from_config(
        &config.provider,
    ));
    let store = store::open_store(config);
    ExchangeRateService::with_clock(
        source,
        store,
        Arc::new(crate::core::SystemClock),
        config.cache.ttl(),
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config);

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&service, amount, &from, &to).await
        }
        AppCommand::Rates => cli::rates::run(&service).await,
        AppCommand::Currencies { query } => {
            cli::currencies::run(&service, query.as_deref()).await
        }
        AppCommand::Status => cli::status::run(&service).await,
    }
}
