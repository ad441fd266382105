use std::fs;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const LATEST_USD: &str = r#"{
        "base": "USD",
        "date": "2026-10-16",
        "rates": {"USD": 1, "EUR": 0.85, "JPY": 149.32, "GBP": 0.79}
    }"#;

    pub async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .and(header("api-key", "integration-key"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            provider:
              base_url: {base_url}
              api_key: "integration-key"
              base_currency: "USD"
            currencies: ["USD", "EUR", "JPY", "GBP"]
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(200, test_utils::LATEST_USD).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "100".to_string(),
            from: Some("usd".to_string()),
            to: Some("EUR".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_defaults_to_first_two_currencies() {
    let mock_server = test_utils::create_mock_server(200, test_utils::LATEST_USD).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "1".to_string(),
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "{:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(200, test_utils::LATEST_USD).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_provider_failure_is_displayed_not_fatal() {
    let mock_server = test_utils::create_mock_server(503, "").await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "10".to_string(),
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "{:?}", result.err());
}

async fn fetched_state(status: u16, body: &str) -> fxconv::core::ConversionState {
    use fxconv::core::ConversionSession;
    use fxconv::providers::exchangerate_api::ExchangeRateApiProvider;
    use std::sync::Arc;

    let mock_server = test_utils::create_mock_server(status, body).await;
    let provider =
        ExchangeRateApiProvider::new(&mock_server.uri(), Some("integration-key"), "USD");
    let session = ConversionSession::new(Arc::new(provider));
    session.fetch_rates().await.expect("fetch task failed");
    session.snapshot()
}

#[test_log::test(tokio::test)]
async fn test_provider_failure_reaches_error_state() {
    use fxconv::cli::convert::display_conversion;
    use fxconv::core::ConversionRequest;

    let state = fetched_state(503, "").await;
    info!(?state, "Session state after failed fetch");

    assert!(state.is_error);
    assert!(
        state
            .error_message
            .starts_with("Failed to fetch rates: HTTP error: 503"),
        "{}",
        state.error_message
    );
    assert!(state.rates.is_empty());

    let output = display_conversion(&state, &ConversionRequest::new("USD", "EUR", "10"));
    assert!(output.contains("Error: Failed to fetch rates: HTTP error: 503"));
    assert!(!output.contains("Conversion:"));
}

#[test_log::test(tokio::test)]
async fn test_rendered_conversion_after_fetch() {
    use fxconv::cli::convert::display_conversion;
    use fxconv::cli::rates::display_rates;
    use fxconv::core::ConversionRequest;

    let state = fetched_state(200, test_utils::LATEST_USD).await;
    assert!(!state.is_error, "{}", state.error_message);

    let output = display_conversion(&state, &ConversionRequest::new("usd", "EUR", "100"));
    assert!(output.contains("USD -> EUR"));
    assert!(output.contains("85.00"));
    assert!(!output.contains("Error:"));

    let currencies = ["USD", "EUR", "JPY", "GBP"].map(String::from);
    let output = display_rates(&state, &currencies, "USD");
    assert!(output.contains("149.3200"));
    assert!(output.contains("0.7900"));
    assert!(!output.contains("N/A"));
}

#[test_log::test(tokio::test)]
async fn test_session_against_mock_provider() {
    use fxconv::core::ConversionSession;
    use fxconv::providers::exchangerate_api::ExchangeRateApiProvider;
    use std::sync::Arc;

    let mock_server = test_utils::create_mock_server(200, test_utils::LATEST_USD).await;
    let provider =
        ExchangeRateApiProvider::new(&mock_server.uri(), Some("integration-key"), "USD");
    let session = ConversionSession::new(Arc::new(provider));
    let mut rx = session.subscribe();

    let _handle = session.fetch_rates();
    rx.changed().await.expect("session dropped");

    let state = rx.borrow().clone();
    info!(?state, "Session state after fetch");
    assert!(!state.is_error, "{}", state.error_message);
    assert_eq!(
        session.convert_formatted("USD", "EUR", "100"),
        Some("85.00".to_string())
    );
    assert_eq!(
        session.convert_formatted("EUR", "USD", "85"),
        Some("100.00".to_string())
    );
    assert_eq!(session.convert_formatted("USD", "XYZ", "100"), None);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("config.yaml");

    let result = fxconv::run_command(fxconv::AppCommand::Rates, missing.to_str()).await;
    let err = result.expect_err("missing config should fail");
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_fails() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "currencies: [\"USD\"]").expect("Failed to write config file");

    let result = fxconv::run_command(
        fxconv::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("single currency config should fail");
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live exchange-rate API"]
async fn test_real_exchange_rate_api() {
    use fxconv::core::RateFetcher;
    use fxconv::providers::exchangerate_api::ExchangeRateApiProvider;

    let provider = ExchangeRateApiProvider::new("https://api.exchangerate-api.com", None, "USD");

    match provider.fetch().await {
        Ok(rates) => {
            info!(count = rates.len(), "Received live rates");
            assert_eq!(rates.get("USD"), Some(1.0));
            assert!(rates.get("EUR").is_some_and(|r| r > 0.0));
        }
        Err(e) => {
            error!("Rate API request failed: {e}\n{e:?}");
            panic!("Rate API request failed: {e}");
        }
    }
}
