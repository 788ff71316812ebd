use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::{
    clients::generation::{GenerationClient, GenerationError, GenerationRequest},
    config::Config,
    models::{
        activity::LearnerActivitySnapshot,
        draft::NotificationDraft,
        retry::{RetryConfig, Retryable},
        validation::{ValidationError, validate_drafts},
    },
    prompt::{SYSTEM_INSTRUCTION, response_schema, user_message},
    signals::{ExtractionPolicy, extract_events},
    utils::retry_with_backoff,
};

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// What gets sent to the generation service as task input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadMode {
    /// The derived event list.
    #[default]
    Events,
    /// The raw activity snapshot.
    Snapshot,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to serialize generation payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("generation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        source: GenerationError,
    },

    #[error("generation rejected: {0}")]
    Rejected(GenerationError),

    #[error("generation returned invalid JSON: {0}")]
    UnparsableOutput(String),

    #[error("generation output violates schema: {0}")]
    InvalidOutput(#[from] ValidationError),
}

impl GenerateError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Serialization(_) => "serialization",
            GenerateError::RetriesExhausted { .. } => "retries_exhausted",
            GenerateError::Rejected(_) => "upstream_rejected",
            GenerateError::UnparsableOutput(_) | GenerateError::InvalidOutput(_) => {
                "invalid_output"
            }
        }
    }
}

/// Turns learner activity into notification drafts via the generation service.
pub struct NotificationGenerator {
    client: Arc<dyn GenerationClient>,
    retry_config: RetryConfig,
    policy: ExtractionPolicy,
    payload_mode: PayloadMode,
    call_timeout: Duration,
}

impl NotificationGenerator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            retry_config: RetryConfig::default(),
            policy: ExtractionPolicy::default(),
            payload_mode: PayloadMode::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn from_config(client: Arc<dyn GenerationClient>, config: &Config) -> Self {
        Self::new(client)
            .with_retry_config(config.retry_config())
            .with_policy(config.extraction_policy())
            .with_payload_mode(config.payload_mode)
            .with_call_timeout(config.generation_timeout())
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn with_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_payload_mode(mut self, payload_mode: PayloadMode) -> Self {
        self.payload_mode = payload_mode;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn client(&self) -> &Arc<dyn GenerationClient> {
        &self.client
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub fn policy(&self) -> &ExtractionPolicy {
        &self.policy
    }

    pub fn payload_mode(&self) -> PayloadMode {
        self.payload_mode
    }

    pub async fn generate(
        &self,
        snapshot: &LearnerActivitySnapshot,
    ) -> Result<Vec<NotificationDraft>, GenerateError> {
        let events = extract_events(snapshot, &self.policy);

        if events.is_empty() {
            debug!("No learner events, skipping generation");
            return Ok(Vec::new());
        }

        let payload = match self.payload_mode {
            PayloadMode::Events => serde_json::to_string(&events)?,
            PayloadMode::Snapshot => serde_json::to_string(snapshot)?,
        };

        let request = GenerationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_message: user_message(&payload, self.payload_mode),
            response_schema: response_schema(),
        };

        info!(
            events = events.len(),
            payload_mode = ?self.payload_mode,
            "Requesting notification copy"
        );

        let client = self.client.as_ref();
        let request = &request;
        let call_timeout = self.call_timeout;

        let text = retry_with_backoff(&self.retry_config, || async move {
            match timeout(call_timeout, client.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout(format!(
                    "no response within {:?}",
                    call_timeout
                ))),
            }
        })
        .await
        .map_err(|e| {
            // Only an exhausted budget lets a transient error escape the loop.
            if e.is_transient() {
                GenerateError::RetriesExhausted {
                    attempts: self.retry_config.max_attempts,
                    source: e,
                }
            } else {
                GenerateError::Rejected(e)
            }
        })?;

        let value: JsonValue = serde_json::from_str(&text)
            .map_err(|e| GenerateError::UnparsableOutput(e.to_string()))?;
        let drafts = validate_drafts(value)?;

        info!(drafts = drafts.len(), "Notification drafts generated");

        Ok(drafts)
    }
}
