use super::ui;
use crate::core::{ConversionSession, ConversionState};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn display_rates(state: &ConversionState, currencies: &[String], base: &str) -> String {
    if state.is_error && state.rates.is_empty() {
        return ui::style_text(
            &format!("Error: {}", state.error_message),
            ui::StyleType::Error,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {base}")),
        ui::header_cell(&format!("{base} per unit")),
    ]);

    for code in currencies {
        let rate = state.rates.get(code);
        table.add_row(vec![
            Cell::new(code),
            ui::format_optional_cell(rate, |r| format!("{r:.4}")),
            ui::format_optional_cell(rate.filter(|r| *r != 0.0), |r| format!("{:.4}", 1.0 / r)),
        ]);
    }

    let mut output = format!(
        "Exchange rates: {}\n\n",
        ui::style_text(base, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    if let Some(fetched_at) = state.fetched_at {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Last updated: {}", fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
                ui::StyleType::Subtle
            )
        ));
    }
    if state.is_error {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("Error: {}", state.error_message),
                ui::StyleType::Error
            )
        ));
    }

    output
}

pub async fn run(session: &ConversionSession, currencies: &[String], base: &str) -> Result<()> {
    let spinner = ui::new_spinner("Fetching rates...");
    session
        .fetch_rates()
        .await
        .context("Rate fetch task did not complete")?;
    spinner.finish_and_clear();

    println!("{}", display_rates(&session.snapshot(), currencies, base));
    Ok(())
}
