//! OpenAiGenerator - Chat Completions REST implementation of TextGenerator.
//!
//! Talks to the OpenAI Chat Completions API (or any compatible endpoint)
//! directly. Configuration comes from environment variables; see
//! [`OpenAiGenerator::try_from_env`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use solace_core::generation::{GenerationError, GenerationPrompt, TextGenerator};
use std::env;
use std::time::Duration;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "SOLACE_OPENAI_API_KEY";
/// Environment variable overriding the model name.
pub const ENV_MODEL: &str = "SOLACE_OPENAI_MODEL";
/// Environment variable overriding the completions endpoint.
pub const ENV_BASE_URL: &str = "SOLACE_OPENAI_BASE_URL";

/// Text generator backed by the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Duration,
}

impl OpenAiGenerator {
    /// Creates a generator with the provided API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// The API key is read from `SOLACE_OPENAI_API_KEY`, falling back to
    /// `OPENAI_API_KEY`. `SOLACE_OPENAI_MODEL` and `SOLACE_OPENAI_BASE_URL`
    /// override the model (default `gpt-4o`) and endpoint when set.
    pub fn try_from_env() -> Result<Self, GenerationError> {
        let api_key = env::var(ENV_API_KEY)
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                GenerationError::NotConfigured(format!(
                    "{} (or OPENAI_API_KEY) is not set",
                    ENV_API_KEY
                ))
            })?;

        let mut generator = Self::new(api_key);
        if let Ok(model) = env::var(ENV_MODEL) {
            generator = generator.with_model(model);
        }
        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            generator = generator.with_base_url(base_url);
        }
        Ok(generator)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the generator at a compatible non-OpenAI endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The model requests are sent with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The endpoint requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_messages(prompt: &GenerationPrompt) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(prompt.messages.len() + 1);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: prompt.system.clone(),
        });
        for message in &prompt.messages {
            messages.push(ChatMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            });
        }
        messages
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, GenerationError> {
        tracing::debug!(
            "[OpenAiGenerator] Requesting completion (model: {}, messages: {})",
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Network {
                message: format!("OpenAI API request failed: {}", err),
                is_timeout: err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("[OpenAiGenerator] API returned status {}", status);
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            GenerationError::malformed(format!("Failed to parse OpenAI response: {}", err))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(prompt),
            max_tokens,
            temperature,
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::malformed("OpenAI API returned no content"))
}

fn map_http_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    GenerationError::Http {
        status: status.as_u16(),
        message,
    }
}
