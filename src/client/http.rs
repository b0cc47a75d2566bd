//! Generator that submits prompts to a running relay over HTTP.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

use super::ContentGenerator;
use crate::ai::build_http_client;
use crate::relay::{GenerationRequest, GenerationResult, ResultBody};
use url::form_urlencoded;

/// Path of the relay route.
pub const GENERATE_PATH: &str = "/api/generate";

/// Posts prompts, form-encoded, to a relay endpoint.
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    /// Creates a client for the relay at `base_url`, e.g.
    /// `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client: build_http_client()?,
            endpoint: format!("{base}{GENERATE_PATH}"),
        })
    }

    /// Full URL of the relay route.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &GenerationRequest) -> GenerationResult {
        debug!(endpoint = %self.endpoint, "Submitting prompt to relay");

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("prompt", request.prompt())
            .finish();

        let response = match self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Relay request failed: {e}");
                return GenerationResult::Failure {
                    message: format!("Could not reach the generation service: {e}"),
                    status_code: 500,
                };
            }
        };

        let status = response.status().as_u16();
        match response.json::<ResultBody>().await {
            Ok(body) => GenerationResult::from_body(status, body),
            Err(e) => {
                warn!(status, "Relay returned an unreadable body: {e}");
                GenerationResult::Failure {
                    message: format!("Unexpected response from the generation service (HTTP {status})"),
                    status_code: if status == 200 { 500 } else { status },
                }
            }
        }
    }
}

impl ContentGenerator for RelayClient {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = GenerationResult> + Send + 'a>> {
        Box::pin(self.post(request))
    }
}
