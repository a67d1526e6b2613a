use crate::core::config::ProviderConfig;
use crate::core::{FetchError, LatestRates, RateSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("xrate/", env!("CARGO_PKG_VERSION"));

/// Client for the `latest` endpoint of exchangeratesapi.io.
pub struct ExchangeRatesApiProvider {
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    base_currency: String,
    symbols: Vec<String>,
}

impl ExchangeRatesApiProvider {
    /// `api_key_env` names the variable `api_key` was read from, for error reporting.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        api_key_env: &str,
        base_currency: &str,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_key_env: api_key_env.to_string(),
            base_currency: base_currency.to_string(),
            symbols,
        }
    }

    /// Builds a provider from config, reading the access key from the environment.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            &config.base_url,
            config.api_key(),
            &config.api_key_env,
            &config.base_currency,
            config.symbols.clone(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    success: bool,
    base: Option<String>,
    date: Option<String>,
    rates: Option<HashMap<String, f64>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    info: Option<String>,
}

impl ExchangeRatesApiProvider {
    fn validate(&self, data: LatestResponse) -> Result<LatestRates, FetchError> {
        if !data.success {
            let info = data
                .error
                .and_then(|e| e.info)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(FetchError::Upstream(info));
        }

        let base = data.base.unwrap_or_else(|| self.base_currency.clone());
        let mut rates = data
            .rates
            .ok_or_else(|| FetchError::Decode("response has no rates".to_string()))?;
        rates.remove(&base);

        let missing: Vec<String> = self
            .symbols
            .iter()
            .filter(|symbol| **symbol != base && !rates.contains_key(*symbol))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(FetchError::MissingSymbols(missing));
        }

        Ok(LatestRates {
            base,
            date: data.date.unwrap_or_default(),
            rates,
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRatesApiProvider {
    fn base_currency(&self) -> &str {
        &self.base_currency
    }

    fn symbols(&self) -> &[String] {
        &self.symbols
    }

    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %self.base_currency))]
    async fn fetch_latest(&self) -> Result<LatestRates, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FetchError::MissingCredential(self.api_key_env.clone()))?;

        let endpoint = format!("{}/latest", self.base_url);
        debug!("Requesting latest rates from {}", endpoint);

        let symbols = self.symbols.join(",");
        let url = reqwest::Url::parse_with_params(
            &endpoint,
            &[
                ("access_key", api_key),
                ("base", self.base_currency.as_str()),
                ("symbols", symbols.as_str()),
            ],
        )
        .map_err(|e| FetchError::Transport(format!("Invalid URL {endpoint}: {e}")))?;

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;
        let data: LatestResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))?;

        let latest = self.validate(data)?;
        debug!(
            date = %latest.date,
            count = latest.rates.len(),
            "Received latest rates"
        );
        Ok(latest)
    }
}
