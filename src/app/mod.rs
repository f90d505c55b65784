mod config;
mod error;
mod logging;
pub mod runtime;

use std::io;

pub use config::AppConfig;
pub use error::AppError;

use crate::adapters::meraki_api::{DashboardClient, MerakiHttpClient};
use crate::adapters::replay_file::ReplayFileClient;
use runtime::{COMPLETED_MESSAGE, FAILURE_MESSAGE, OutagePipeline};

pub fn run() -> Result<(), AppError> {
    let config = bootstrap()?;
    let client = build_client(&config)?;
    let pipeline = OutagePipeline::new(client.as_ref(), config.output_csv.clone());

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    if let Err(error) = runtime::run_interactive(&pipeline, &mut input, &mut output) {
        tracing::error!(error = %error, "an error occurred");
        println!("{FAILURE_MESSAGE}");
    }

    Ok(())
}

pub fn run_export() -> Result<(), AppError> {
    let config = bootstrap()?;
    let org_id = config
        .org_id
        .clone()
        .ok_or_else(|| AppError::config("MERAKI_ORG_ID is required for non-interactive export"))?;
    let client = build_client(&config)?;
    let pipeline = OutagePipeline::new(client.as_ref(), config.output_csv.clone());

    match runtime::run_for_organization(&pipeline, &org_id) {
        Some(_) => println!("{COMPLETED_MESSAGE}"),
        None => println!("{FAILURE_MESSAGE}"),
    }

    Ok(())
}

fn bootstrap() -> Result<AppConfig, AppError> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    logging::init(&config.log_path, config.verbose_logging)?;

    tracing::info!(
        base_url = %config.base_url,
        replay_file = ?config.replay_file,
        http_timeout_secs = config.http_timeout_secs,
        verbose_logging = config.verbose_logging,
        output_csv = %config.output_csv.display(),
        "device outage report initialized"
    );

    Ok(config)
}

fn build_client(config: &AppConfig) -> Result<Box<dyn DashboardClient>, AppError> {
    if let Some(path) = &config.replay_file {
        let client = ReplayFileClient::from_file(path).map_err(AppError::Client)?;
        return Ok(Box::new(client));
    }

    let client = MerakiHttpClient::new(&config.api_settings()?).map_err(AppError::Client)?;
    Ok(Box::new(client))
}
