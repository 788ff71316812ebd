use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::{
    generator::PayloadMode,
    models::{retry::RetryConfig, validation::MAX_COMPLETION},
    signals::{DEFAULT_MILESTONE_THRESHOLD, ExtractionPolicy},
};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_generation_timeout_seconds")]
    pub generation_timeout_seconds: u64,

    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: u64,
    #[serde(default = "default_max_retry_jitter_ms")]
    pub max_retry_jitter_ms: u64,

    #[serde(default)]
    pub payload_mode: PayloadMode,
    #[serde(default = "default_milestone_threshold")]
    pub milestone_threshold: u32,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generation_timeout_seconds() -> u64 {
    30
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_initial_retry_delay_ms() -> u64 {
    1000
}

fn default_max_retry_delay_ms() -> u64 {
    30_000
}

fn default_retry_backoff_multiplier() -> u64 {
    2
}

fn default_max_retry_jitter_ms() -> u64 {
    500
}

fn default_milestone_threshold() -> u32 {
    DEFAULT_MILESTONE_THRESHOLD
}

fn default_server_port() -> u16 {
    8000
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Builds a config from `KEY=value` pairs, as `load` does from the process
    /// environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.gemini_api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY must not be empty");
        }

        if self.max_retry_attempts == 0 {
            bail!("MAX_RETRY_ATTEMPTS must be at least 1");
        }

        if self.generation_timeout_seconds == 0 {
            bail!("GENERATION_TIMEOUT_SECONDS must be at least 1");
        }

        if !(1..=MAX_COMPLETION).contains(&self.milestone_threshold) {
            bail!(
                "MILESTONE_THRESHOLD must be between 1 and {}, got {}",
                MAX_COMPLETION,
                self.milestone_threshold
            );
        }

        Ok(())
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_retry_attempts,
            initial_delay_ms: self.initial_retry_delay_ms,
            max_delay_ms: self.max_retry_delay_ms,
            backoff_multiplier: self.retry_backoff_multiplier,
            max_jitter_ms: self.max_retry_jitter_ms,
        }
    }

    pub fn extraction_policy(&self) -> ExtractionPolicy {
        ExtractionPolicy {
            milestone_threshold: self.milestone_threshold,
        }
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_seconds)
    }
}
