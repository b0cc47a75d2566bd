//! Text-generation provider trait and shared request/response types.

pub mod openai;
#[cfg(test)]
pub(crate) mod test_utils;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;

/// HTTP request timeout for provider API calls.
///
/// The relay adds no timeout of its own; this is the only bound on how long
/// a request may wait on the provider.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sampling parameters sent with every chat completion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling value.
    pub top_p: f32,
    /// Frequency penalty.
    pub frequency_penalty: f32,
    /// Presence penalty.
    pub presence_penalty: f32,
}

/// A system instruction plus one user message.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatExchange {
    /// System message fixing persona and style.
    pub system: String,
    /// User message carrying the prompt.
    pub user: String,
    /// Fixed generation parameters.
    pub params: GenerationParams,
}

/// Raw outcome of a successful provider call.
///
/// Nothing here is interpreted by the provider; the relay decides whether
/// the content is usable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderReply {
    /// Text of the first choice, if any.
    pub content: Option<String>,
    /// Model reported by the provider.
    pub model: Option<String>,
    /// Token usage metadata, passed through opaquely.
    pub usage: Option<serde_json::Value>,
}

/// Metadata about a provider implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Service provider name, used as the prefix of API error messages.
    pub provider: String,
    /// Model identifier requested on every call.
    pub model: String,
}

/// Builds an HTTP client with the standard request timeout.
pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Returns at most `max_chars` characters of `text`, followed by `...`.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}

/// Trait for chat-completion services.
pub trait TextGenerationProvider: Send + Sync {
    /// Sends one exchange to the provider, authenticated with `api_key`.
    fn send_request<'a>(
        &'a self,
        api_key: &'a str,
        exchange: &'a ChatExchange,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply>> + Send + 'a>>;

    /// Returns metadata about the provider implementation.
    fn get_metadata(&self) -> ProviderMetadata;
}
