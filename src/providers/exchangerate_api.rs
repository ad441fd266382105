use crate::core::config::ProviderConfig;
use crate::core::{FetchError, RateFetcher, RateTable};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Fetches the latest rates from exchangerate-api.com style endpoints
/// (`{base_url}/v4/latest/{base}`).
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    base_currency: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<&str>, base_currency: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            base_currency: base_currency.to_uppercase(),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            &config.base_url,
            config.api_key.as_deref(),
            &config.base_currency,
        )
    }

    fn endpoint(&self) -> Result<Url, FetchError> {
        let url = format!("{}/v4/latest/{}", self.base_url, self.base_currency);
        Url::parse(&url).map_err(|e| FetchError::InvalidEndpoint {
            url,
            reason: e.to_string(),
        })
    }
}

// Only `rates` is consumed; `base`, `date` and friends are ignored.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: RateTable,
}

#[async_trait]
impl RateFetcher for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateApiFetch",
        skip(self),
        fields(base = %self.base_currency)
    )]
    async fn fetch(&self) -> Result<RateTable, FetchError> {
        let url = self.endpoint()?;
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxconv/0.1")
            .build()
            .map_err(FetchError::Network)?;

        let mut request = client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request.send().await.map_err(FetchError::Network)?;
        debug!(status = %response.status(), "Received rates response");

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status()));
        }

        let text = response.text().await.map_err(FetchError::Network)?;
        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(FetchError::Decode)?;

        let mut rates = data.rates;
        rates.ensure_base(&self.base_currency);
        debug!(count = rates.len(), "Decoded rate table");
        Ok(rates)
    }
}
