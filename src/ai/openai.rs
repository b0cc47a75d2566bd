//! OpenAI chat-completion provider.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{
    build_http_client, ChatExchange, GenerationParams, ProviderMetadata, ProviderReply,
    TextGenerationProvider,
};
use crate::config::RelayConfig;
use crate::error::ProviderError;

/// Provider name used in error messages.
const PROVIDER_NAME: &str = "OpenAI";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Chat message in the request body.
#[derive(Serialize, Debug)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat-completion request body.
#[derive(Serialize, Debug)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(flatten)]
    params: GenerationParams,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

/// Chat-completion response body. Every field is optional so that a
/// well-formed but empty answer is reported as "no content" rather than
/// as a decode failure.
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

/// `{ "error": { "message": ... } }`
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Extracts `error.message` from an error body, if present.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
}

/// OpenAI chat-completion client.
pub struct OpenAiProvider {
    client: Client,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Creates a provider for `model` at `base_url`.
    pub fn new(model: String, base_url: String) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            model,
            base_url,
        })
    }

    /// Creates a provider from relay configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        Self::new(config.model.clone(), config.api_base.clone())
    }

    /// Builds the full chat-completions URL.
    fn get_api_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/v1/chat/completions")
    }
}

impl TextGenerationProvider for OpenAiProvider {
    fn send_request<'a>(
        &'a self,
        api_key: &'a str,
        exchange: &'a ChatExchange,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply>> + Send + 'a>> {
        Box::pin(async move {
            let request = OpenAiRequest {
                model: &self.model,
                messages: vec![
                    Message {
                        role: "system",
                        content: &exchange.system,
                    },
                    Message {
                        role: "user",
                        content: &exchange.user,
                    },
                ],
                params: exchange.params,
            };

            debug!(
                model = %self.model,
                max_tokens = request.params.max_tokens,
                temperature = request.params.temperature,
                user_prompt_len = exchange.user.len(),
                "Built chat-completion request payload"
            );

            let api_url = self.get_api_url();
            info!(url = %api_url, model = %self.model, "Sending request to OpenAI API");

            let response = self
                .client
                .post(&api_url)
                .bearer_auth(api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    error!("OpenAI API transport error: {e}");
                    ProviderError::NetworkError {
                        provider: PROVIDER_NAME.to_string(),
                        message: e.to_string(),
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_else(|e| {
                    debug!("Failed to read error response body: {e}");
                    String::new()
                });
                error!(status = %status, body = %body, "OpenAI API error");
                let message = error_message(&body).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or(status.as_str())
                        .to_string()
                });
                return Err(ProviderError::ApiRequestFailed {
                    provider: PROVIDER_NAME.to_string(),
                    message,
                }
                .into());
            }

            let body: OpenAiResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponseFormat(e.to_string()))?;

            debug!(
                choice_count = body.choices.len(),
                model = ?body.model,
                usage = ?body.usage,
                "Received OpenAI API response"
            );

            let content = body
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content);

            Ok(ProviderReply {
                content,
                model: body.model,
                usage: body.usage,
            })
        })
    }

    fn get_metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            provider: PROVIDER_NAME.to_string(),
            model: self.model.clone(),
        }
    }
}
