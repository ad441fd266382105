use super::ui;
use crate::core::{ConversionRequest, ConversionSession, ConversionState};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::info;

/// Renders the outcome of a conversion against a state snapshot.
///
/// An error is shown first; when stale rates are still around the conversion
/// is rendered below it using those rates.
pub fn display_conversion(state: &ConversionState, request: &ConversionRequest) -> String {
    let mut output = String::new();

    if state.is_error {
        output.push_str(&ui::style_text(
            &format!("Error: {}", state.error_message),
            ui::StyleType::Error,
        ));
        if state.rates.is_empty() {
            return output;
        }
        output.push_str("\n\n");
        output.push_str(&ui::style_text(
            "Showing previously fetched rates",
            ui::StyleType::Subtle,
        ));
        output.push('\n');
    }

    let result = state.convert(request);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Amount ({})", request.source)),
        ui::header_cell(&format!("Converted ({})", request.destination)),
        ui::header_cell("Rate"),
    ]);
    table.add_row(vec![
        Cell::new(request.amount.trim()),
        result.map_or(ui::na_cell(true), |r| ui::highlight_cell(&r.to_string())),
        ui::format_optional_cell(result, |r| format!("{:.4}", r.rate)),
    ]);

    output.push_str(&format!(
        "Conversion: {}\n\n",
        ui::style_text(
            &format!("{} -> {}", request.source, request.destination),
            ui::StyleType::Title
        )
    ));
    output.push_str(&table.to_string());

    if result.is_none() {
        output.push_str("\n\n");
        output.push_str(&ui::style_text(
            "No result: check the amount is a number and both currencies are available",
            ui::StyleType::Subtle,
        ));
    }

    output
}

pub async fn run(session: &ConversionSession, request: ConversionRequest) -> Result<()> {
    let spinner = ui::new_spinner("Fetching rates...");
    session
        .fetch_rates()
        .await
        .context("Rate fetch task did not complete")?;
    spinner.finish_and_clear();

    let state = session.snapshot();
    info!(
        source = %request.source,
        destination = %request.destination,
        is_error = state.is_error,
        "Converting"
    );
    println!("{}", display_conversion(&state, &request));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FetchResult, RateTable};

    fn state_with(rates: RateTable) -> ConversionState {
        let mut state = ConversionState::new();
        state.apply_fetch_result(FetchResult::Success(rates));
        state
    }

    #[test]
    fn test_display_successful_conversion() {
        let state = state_with(RateTable::from([("USD", 1.0), ("EUR", 0.85)]));
        let output = display_conversion(&state, &ConversionRequest::new("USD", "EUR", "100"));

        assert!(output.contains("USD -> EUR"));
        assert!(output.contains("85.00"));
        assert!(output.contains("0.8500"));
        assert!(!output.contains("No result"));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_display_no_result() {
        let state = state_with(RateTable::from([("USD", 1.0)]));
        let output = display_conversion(&state, &ConversionRequest::new("USD", "XYZ", "100"));

        assert!(output.contains("N/A"));
        assert!(output.contains("No result"));
    }

    #[test]
    fn test_display_error_without_rates() {
        let mut state = ConversionState::new();
        state.apply_fetch_result(FetchResult::Failure(
            "Failed to fetch rates: HTTP error: 500 Internal Server Error".to_string(),
        ));
        let output = display_conversion(&state, &ConversionRequest::new("USD", "EUR", "1"));

        assert!(output.contains("Error: Failed to fetch rates: HTTP error: 500"));
        assert!(!output.contains("Conversion:"));
    }

    #[test]
    fn test_display_error_with_stale_rates() {
        let mut state = state_with(RateTable::from([("USD", 1.0), ("EUR", 0.85)]));
        state.apply_fetch_result(FetchResult::Failure("offline".to_string()));
        let output = display_conversion(&state, &ConversionRequest::new("EUR", "USD", "85"));

        assert!(output.contains("Error: offline"));
        assert!(output.contains("previously fetched rates"));
        assert!(output.contains("100.00"));
    }
}
