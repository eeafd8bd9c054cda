mod chart;

use std::sync::Arc;
use std::time::Duration;

use tickchart_core::config::{API_KEY_ENV, BASE_URL_ENV, TIMEOUT_ENV};
use tickchart_core::{
    ChartPipeline, ClientConfig, Operation, PipelineOutput, PipelineRequest, ReqwestHttpClient,
    Symbol, ValidationError,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<PipelineOutput, CliError> {
    let config = client_config(cli, |name| std::env::var(name).ok())?;
    debug!(base_url = %config.base_url, timeout_ms = ?config.timeout_ms, "resolved configuration");

    let pipeline = ChartPipeline::from_config(Arc::new(ReqwestHttpClient::new()), &config);
    let request = build_request(&cli.command)?
        .with_deadline(config.timeout_ms.map(Duration::from_millis));

    Ok(pipeline.run(&request).await?)
}

fn build_request(command: &Command) -> Result<PipelineRequest, ValidationError> {
    match command {
        Command::Price(args) => Ok(PipelineRequest::new(
            Operation::SpotStockPrice,
            Symbol::parse(&args.symbol)?,
        )),
        Command::Crypto(args) => Ok(PipelineRequest::new(
            Operation::SpotCryptoPrice,
            Symbol::parse(&args.symbol)?,
        )),
        Command::Overview(args) => Ok(PipelineRequest::new(
            Operation::CompanyOverview,
            Symbol::parse(&args.symbol)?,
        )),
        Command::Chart(args) => chart::request(args),
    }
}

/// Environment configuration with command-line flags taking precedence.
fn client_config<F>(cli: &Cli, env: F) -> Result<ClientConfig, ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = [
        (API_KEY_ENV, cli.api_key.clone()),
        (BASE_URL_ENV, cli.base_url.clone()),
        (TIMEOUT_ENV, cli.timeout_ms.map(|value| value.to_string())),
    ];

    ClientConfig::from_lookup(|name| {
        overrides
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.clone())
            .or_else(|| env(name))
    })
}
