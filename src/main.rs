use std::sync::Arc;

use anyhow::{Error, Result};
use nudge_service::{
    api::run_api_server, clients::gemini::GeminiClient, config::Config,
    generator::NotificationGenerator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    info!(
        model = %config.gemini_model,
        payload_mode = ?config.payload_mode,
        milestone_threshold = config.milestone_threshold,
        "Configuration validated"
    );

    let client = Arc::new(GeminiClient::new(&config)?);
    let generator = NotificationGenerator::from_config(client, &config);

    run_api_server(config, generator).await
}
