//! Exchange rate tables and the outcome of fetching them

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Exchange rates keyed by currency code, expressed against a single base
/// currency whose rate is 1.0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, f64>")]
pub struct RateTable(HashMap<String, f64>);

impl RateTable {
    /// Looks up a rate; codes are matched case-insensitively.
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0
            .get(code)
            .or_else(|| self.0.get(&code.to_uppercase()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Makes sure the base currency is present at 1.0 without overriding a
    /// rate the provider did send.
    pub(crate) fn ensure_base(&mut self, base: &str) {
        self.0.entry(base.to_uppercase()).or_insert(1.0);
    }
}

impl From<HashMap<String, f64>> for RateTable {
    fn from(rates: HashMap<String, f64>) -> Self {
        RateTable(
            rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, f64); N]> for RateTable {
    fn from(rates: [(&str, f64); N]) -> Self {
        RateTable(
            rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
        )
    }
}

/// Reasons a rate fetch can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Request error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Failed to parse JSON response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Outcome of a single fetch, ready to be applied to the conversion state.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Success(RateTable),
    Failure(String),
}

impl From<Result<RateTable, FetchError>> for FetchResult {
    fn from(result: Result<RateTable, FetchError>) -> Self {
        match result {
            Ok(rates) => FetchResult::Success(rates),
            Err(e) => FetchResult::Failure(format!("Failed to fetch rates: {e}")),
        }
    }
}
