//! Generation relay: validate a prompt, call the provider once, normalize
//! the outcome.

pub mod prompts;

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{error, info};

use crate::ai::openai::OpenAiProvider;
use crate::ai::{preview, TextGenerationProvider};
use crate::client::ContentGenerator;
use crate::config::RelayConfig;
use crate::error::RelayError;

/// Number of characters of generated text written to the log.
const PREVIEW_CHARS: usize = 100;

/// A validated prompt. The text is trimmed and never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
}

impl GenerationRequest {
    /// Validates raw user input.
    pub fn new(raw: &str) -> Result<Self, RelayError> {
        let prompt = raw.trim();
        if prompt.is_empty() {
            return Err(RelayError::InvalidInput);
        }
        Ok(Self {
            prompt: prompt.to_string(),
        })
    }

    /// The trimmed prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Payload of a successful generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedContent {
    /// Trimmed generated text.
    pub text: String,
    /// The trimmed prompt, echoed verbatim.
    pub prompt: String,
    /// Model identifier used for the call.
    pub model: String,
    /// Provider usage metadata, uninterpreted.
    pub usage: Option<serde_json::Value>,
}

/// Outcome of one generation attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationResult {
    /// Text was generated.
    Success(GeneratedContent),
    /// Generation failed; `status_code` is the HTTP status to report.
    Failure {
        /// Human-readable failure message.
        message: String,
        /// HTTP status code.
        status_code: u16,
    },
}

impl GenerationResult {
    /// HTTP status for this result.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure { status_code, .. } => *status_code,
        }
    }

    /// Returns true for [`GenerationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts to the JSON body sent to clients.
    pub fn to_body(&self) -> ResultBody {
        match self {
            Self::Success(content) => ResultBody {
                success: true,
                generated_text: Some(content.text.clone()),
                prompt: Some(content.prompt.clone()),
                model: Some(content.model.clone()),
                usage: content.usage.clone(),
                error: None,
            },
            Self::Failure { message, .. } => ResultBody {
                success: false,
                error: Some(message.clone()),
                ..ResultBody::default()
            },
        }
    }

    /// Rebuilds a result from a response body and its HTTP status.
    pub fn from_body(status_code: u16, body: ResultBody) -> Self {
        match body {
            ResultBody {
                success: true,
                generated_text: Some(text),
                prompt,
                model,
                usage,
                ..
            } => Self::Success(GeneratedContent {
                text,
                prompt: prompt.unwrap_or_default(),
                model: model.unwrap_or_default(),
                usage,
            }),
            ResultBody { success: true, .. } => RelayError::EmptyGeneration.into(),
            ResultBody { error, .. } => Self::Failure {
                message: error
                    .unwrap_or_else(|| format!("Request failed with status {status_code}")),
                status_code,
            },
        }
    }
}

impl From<RelayError> for GenerationResult {
    fn from(err: RelayError) -> Self {
        Self::Failure {
            status_code: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl Serialize for GenerationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body().serialize(serializer)
    }
}

/// Wire shape of a relay response: `{ success, ...resultFields }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBody {
    /// Whether generation succeeded.
    pub success: bool,
    /// Generated text (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
    /// Echoed prompt (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Model identifier (success only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Usage metadata (success only, when the provider sent it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
    /// Failure message (failure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Stateless request handler relaying prompts to a text-generation provider.
pub struct RelayHandler {
    provider: Box<dyn TextGenerationProvider>,
    api_key: Option<String>,
}

impl RelayHandler {
    /// Creates a handler around `provider`, authenticating with `api_key`.
    pub fn new(provider: Box<dyn TextGenerationProvider>, api_key: Option<String>) -> Self {
        Self { provider, api_key }
    }

    /// Creates a handler backed by the OpenAI provider.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let provider = OpenAiProvider::from_config(config)?;
        Ok(Self::new(Box::new(provider), config.api_key.clone()))
    }

    /// Model identifier the handler reports on success.
    pub fn model(&self) -> String {
        self.provider.get_metadata().model
    }

    /// Handles one inbound request.
    ///
    /// `prompt` is the raw form field; `None` means it was absent or the body
    /// could not be read as a form.
    pub async fn handle(&self, method: &str, prompt: Option<&str>) -> GenerationResult {
        match self.relay(method, prompt).await {
            Ok(content) => GenerationResult::Success(content),
            Err(err) => err.into(),
        }
    }

    async fn relay(
        &self,
        method: &str,
        prompt: Option<&str>,
    ) -> Result<GeneratedContent, RelayError> {
        if method != "POST" {
            return Err(RelayError::MethodNotAllowed);
        }
        let request = GenerationRequest::new(prompt.ok_or(RelayError::InvalidInput)?)?;
        self.generate_content(&request).await
    }

    /// Runs the provider call for an already-validated request.
    pub async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, RelayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("{} environment variable is not set", crate::config::API_KEY_VAR);
            return Err(RelayError::ConfigurationMissing);
        };

        let metadata = self.provider.get_metadata();
        info!(
            provider = %metadata.provider,
            prompt = %request.prompt(),
            "Generating content for prompt"
        );

        let exchange = prompts::build_exchange(request);
        let reply = self
            .provider
            .send_request(api_key, &exchange)
            .await
            .map_err(|e| {
                error!("Provider call failed: {e:#}");
                RelayError::from_provider(&e)
            })?;

        let text = reply
            .content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                error!("No content generated by provider");
                RelayError::EmptyGeneration
            })?;

        info!(
            reported_model = reply.model.as_deref().unwrap_or("unknown"),
            usage = ?reply.usage,
            "Successfully generated content: {}",
            preview(text, PREVIEW_CHARS)
        );

        Ok(GeneratedContent {
            text: text.to_string(),
            prompt: request.prompt().to_string(),
            model: metadata.model,
            usage: reply.usage,
        })
    }
}

impl ContentGenerator for RelayHandler {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = GenerationResult> + Send + 'a>> {
        Box::pin(self.handle("POST", Some(request.prompt())))
    }
}
