use std::fs;
use std::sync::Arc;
use tracing::info;
use xrate::core::config::AppConfig;
use xrate::core::{KeyValueStore, RateError, RateSource};
use xrate::providers::ExchangeRatesApiProvider;
use xrate::service::{CACHE_KEY, ExchangeRateService};
use xrate::store::disk::FjallStore;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate, Times};

    pub const LATEST_RESPONSE: &str = r#"{
        "success": true,
        "timestamp": 1736935199,
        "base": "EUR",
        "date": "2025-01-15",
        "rates": { "USD": 1.1, "JPY": 160.0, "GBP": 0.85 }
    }"#;

    pub async fn create_mock_server(
        status: u16,
        body: &str,
        expected_calls: impl Into<Times>,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn symbols() -> Vec<String> {
        vec!["USD".to_string(), "JPY".to_string(), "GBP".to_string()]
    }
}

fn provider(base_url: &str) -> Arc<ExchangeRatesApiProvider> {
    Arc::new(ExchangeRatesApiProvider::new(
        base_url,
        Some("integration-key".to_string()),
        "XRATE_API_KEY",
        "EUR",
        test_utils::symbols(),
    ))
}

#[test_log::test(tokio::test)]
async fn test_rates_persist_across_service_instances() {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mock_server =
        test_utils::create_mock_server(200, test_utils::LATEST_RESPONSE, 1u64).await;

    {
        let store = Arc::new(FjallStore::open(data_dir.path()).unwrap());
        let service = ExchangeRateService::new(provider(&mock_server.uri()), store);
        let jpy = service.convert(1.0, "USD", "JPY").await.unwrap();
        info!(?jpy, "Converted through a fresh fetch");
        assert!((jpy - 145.4545).abs() < 0.001);
    }

    // A second instance on the same data directory is served from disk.
    let store = Arc::new(FjallStore::open(data_dir.path()).unwrap());
    let service = ExchangeRateService::new(provider(&mock_server.uri()), store);
    let status = service.cache_status().await;
    assert!(status.is_fresh);

    let gbp = service.convert(100.0, "EUR", "GBP").await.unwrap();
    assert!((gbp - 85.0).abs() < 1e-9);
    let currencies = service.supported_currencies().await.unwrap();
    assert_eq!(currencies.len(), 4);
    // The mock verifies on drop that only one request was made.
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_without_cache() {
    let mock_server = test_utils::create_mock_server(503, "Service Unavailable", 1u64).await;
    let store = Arc::new(xrate::store::memory::MemoryStore::new());
    let service = ExchangeRateService::new(provider(&mock_server.uri()), store);

    let err = service.convert(1.0, "USD", "JPY").await.unwrap_err();
    assert!(matches!(err, RateError::Fetch(_)), "{err:?}");
    assert_eq!(err.to_string(), "HTTP error: 503");
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_falls_back_to_persisted_rates() {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let record = r#"{"snapshot":{"base":"EUR","date":"2025-01-01",
        "rates":{"USD":1.03,"JPY":162.0,"GBP":0.83},"fetched_at_ms":1735725600000},
        "cached_at_ms":1735725600000}"#;
    {
        let store = FjallStore::open(data_dir.path()).unwrap();
        store.set(CACHE_KEY, record).await.unwrap();
    }

    let body = r#"{"success": false, "error": {"code": 104, "info": "Monthly usage limit reached."}}"#;
    let mock_server = test_utils::create_mock_server(200, body, 1u64).await;
    let store = Arc::new(FjallStore::open(data_dir.path()).unwrap());
    let service = ExchangeRateService::new(provider(&mock_server.uri()), store);

    let snapshot = service.get_rates().await.unwrap();
    assert_eq!(snapshot.date, "2025-01-01");
    assert!(!service.cache_status().await.is_fresh);
    assert!((service.convert(100.0, "EUR", "USD").await.unwrap() - 103.0).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_missing_api_key_is_reported() {
    let mock_server = test_utils::create_mock_server(200, test_utils::LATEST_RESPONSE, 0u64).await;
    let source = Arc::new(ExchangeRatesApiProvider::new(
        &mock_server.uri(),
        None,
        "XRATE_INTEGRATION_TEST_MISSING_KEY",
        "EUR",
        test_utils::symbols(),
    ));
    assert_eq!(source.base_currency(), "EUR");
    let store = Arc::new(xrate::store::memory::MemoryStore::new());
    let service = ExchangeRateService::new(source, store);

    let err = service.get_rates().await.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("XRATE_INTEGRATION_TEST_MISSING_KEY"));
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server =
        test_utils::create_mock_server(200, test_utils::LATEST_RESPONSE, 1u64..).await;
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let api_key_env = "XRATE_INTEGRATION_TEST_FULL_FLOW_KEY";
    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var(api_key_env, "integration-key") };

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        provider:
          base_url: {}
          api_key_env: {}
          symbols: ["USD", "JPY", "GBP"]
        cache:
          ttl_minutes: 30
        data_path: {}
    "#,
        mock_server.uri(),
        api_key_env,
        data_dir.path().display()
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let config = AppConfig::load_from_path(config_path).unwrap();
    assert_eq!(config.cache.ttl_minutes, 30);

    let config_path = config_path.to_str().unwrap();
    for command in [
        xrate::AppCommand::Convert {
            amount: 250.0,
            from: "USD".to_string(),
            to: "JPY".to_string(),
        },
        xrate::AppCommand::Rates,
        xrate::AppCommand::Currencies {
            query: Some("dollar".to_string()),
        },
        xrate::AppCommand::Status,
    ] {
        let result = xrate::run_command(command.clone(), Some(config_path)).await;
        assert!(
            result.is_ok(),
            "{command:?} failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_fails_command() {
    let mock_server =
        test_utils::create_mock_server(200, test_utils::LATEST_RESPONSE, 1u64).await;
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let api_key_env = "XRATE_INTEGRATION_TEST_UNKNOWN_CODE_KEY";
    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var(api_key_env, "integration-key") };

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
        provider:
          base_url: {}
          api_key_env: {}
          symbols: ["USD", "JPY", "GBP"]
        data_path: {}
    "#,
        mock_server.uri(),
        api_key_env,
        data_dir.path().display()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = xrate::run_command(
        xrate::AppCommand::Convert {
            amount: 1.0,
            from: "EUR".to_string(),
            to: "ZZZ".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Exchange rate not found for ZZZ");
}
