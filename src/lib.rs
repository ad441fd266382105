pub mod cli;
pub mod core;
pub mod providers;

use crate::core::{ConversionRequest, ConversionSession, config::AppConfig};
use anyhow::Result;
use providers::exchangerate_api::ExchangeRateApiProvider;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Convert `amount`; missing currencies fall back to the configured defaults.
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Rates,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = ExchangeRateApiProvider::from_config(&config.provider);
    let session = ConversionSession::new(Arc::new(provider));

    match command {
        AppCommand::Convert { amount, from, to } => {
            let source = from.as_deref().unwrap_or(config.default_source());
            let destination = to.as_deref().unwrap_or(config.default_destination());
            let request = ConversionRequest::new(source, destination, &amount);
            cli::convert::run(&session, request).await
        }
        AppCommand::Rates => {
            cli::rates::run(&session, &config.currencies, &config.provider.base_currency).await
        }
    }
}
