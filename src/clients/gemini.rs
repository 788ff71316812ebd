use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use crate::{
    clients::generation::{GenerationClient, GenerationError, GenerationRequest},
    config::Config,
    models::gemini::{
        ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse,
        GenerationConfig,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Google Generative Language API over plain REST.
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.generation_timeout())
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(
            base_url = %config.gemini_base_url,
            model = %config.gemini_model,
            "Gemini client initialized"
        );

        Ok(Self {
            http_client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model)
    }

    async fn status_error(response: Response) -> GenerationError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
            .map(|envelope| envelope.error.message)
            .unwrap_or(text);

        warn!(status, error = %message, "Gemini request rejected");

        GenerationError::Status { status, message }
    }
}

fn transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout(error.to_string())
    } else {
        GenerationError::Transport(error.to_string())
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}:generateContent", self.model_url());

        let body = GenerateContentRequest {
            system_instruction: Content::text(request.system_instruction.clone()),
            contents: vec![Content::user(request.user_message.clone())],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
            },
        };

        debug!(model = %self.model, "Sending Gemini generateContent request");

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    transport_error(e)
                } else {
                    GenerationError::MalformedResponse(e.to_string())
                }
            })?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedResponse("no candidates returned".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::MalformedResponse(format!(
                "empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        debug!(response_len = text.len(), "Gemini response received");

        Ok(text)
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        let response = self
            .http_client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }
}
