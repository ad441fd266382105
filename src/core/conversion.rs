//! Conversion state and arithmetic

use super::rates::{FetchResult, RateTable};
use chrono::{DateTime, Utc};
use std::fmt::{self, Display};
use tracing::{debug, warn};

/// A user-entered conversion. The amount is kept as typed and parsed lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: String,
    pub destination: String,
    pub amount: String,
}

impl ConversionRequest {
    pub fn new(source: &str, destination: &str, amount: &str) -> Self {
        ConversionRequest {
            source: source.to_uppercase(),
            destination: destination.to_uppercase(),
            amount: amount.to_string(),
        }
    }

    /// Parses the amount text, rejecting anything that is not a finite number.
    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    /// Converted amount in the destination currency, unrounded.
    pub amount: f64,
    /// Units of destination currency per unit of source currency.
    pub rate: f64,
}

/// Formats with two fractional digits, the same rounding `{:.2}` applies.
/// Anything that rounds to zero renders as "0.00", never "-0.00".
impl Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format!("{:.2}", self.amount);
        match formatted.strip_prefix('-') {
            Some(unsigned) if unsigned == "0.00" => f.write_str(unsigned),
            _ => f.write_str(&formatted),
        }
    }
}

/// Session-scoped state: the latest rate table and the outcome of the last
/// fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionState {
    pub rates: RateTable,
    pub is_error: bool,
    pub error_message: String,
    /// When `rates` was last replaced.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Number of fetch results applied so far; zero until the first fetch
    /// completes.
    pub revision: u64,
}

impl ConversionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_fetch_result(&mut self, result: FetchResult) {
        self.revision += 1;
        match result {
            FetchResult::Success(rates) => {
                debug!(count = rates.len(), revision = self.revision, "Rates loaded");
                self.rates = rates;
                self.is_error = false;
                self.error_message.clear();
                self.fetched_at = Some(Utc::now());
            }
            FetchResult::Failure(message) => {
                // Prior rates stay usable.
                warn!(%message, revision = self.revision, "Rate fetch failed");
                self.is_error = true;
                self.error_message = message;
            }
        }
    }

    pub fn convert(&self, request: &ConversionRequest) -> Option<ConversionResult> {
        let amount = request.parsed_amount()?;
        let source_rate = self.rates.get(&request.source)?;
        let destination_rate = self.rates.get(&request.destination)?;

        let converted = amount / source_rate * destination_rate;
        if !converted.is_finite() {
            debug!(?request, "Conversion produced a non-finite amount");
            return None;
        }

        Some(ConversionResult {
            amount: converted,
            rate: destination_rate / source_rate,
        })
    }

    /// Converts and formats for display; `None` means there is nothing to show.
    pub fn convert_formatted(
        &self,
        source: &str,
        destination: &str,
        amount: &str,
    ) -> Option<String> {
        self.convert(&ConversionRequest::new(source, destination, amount))
            .map(|result| result.to_string())
    }
}
