//! Shared test utilities for provider consumers.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use super::{ChatExchange, ProviderMetadata, ProviderReply, TextGenerationProvider};

/// Mock provider with a pre-programmed queue of replies.
///
/// Replies are returned in FIFO order. When the queue is exhausted,
/// subsequent calls return `Err("no more mock responses")`.
///
/// Every call records the `(api_key, exchange)` pair. Use
/// [`request_handle`](Self::request_handle) to read them after the provider
/// has been moved into a [`RelayHandler`](crate::relay::RelayHandler).
pub(crate) struct ConfigurableMockProvider {
    responses: Arc<Mutex<VecDeque<Result<ProviderReply>>>>,
    recorded: Arc<Mutex<Vec<(String, ChatExchange)>>>,
    metadata: ProviderMetadata,
}

impl ConfigurableMockProvider {
    /// Creates a mock that returns the given replies in order.
    pub(crate) fn new(responses: Vec<Result<ProviderReply>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            recorded: Arc::new(Mutex::new(Vec::new())),
            metadata: ProviderMetadata {
                provider: "OpenAI".to_string(),
                model: "mock-model".to_string(),
            },
        }
    }

    /// Creates a mock that answers once with `content`.
    pub(crate) fn replying(content: &str) -> Self {
        Self::new(vec![Ok(ProviderReply {
            content: Some(content.to_string()),
            model: Some("mock-model".to_string()),
            usage: Some(serde_json::json!({ "total_tokens": 12 })),
        })])
    }

    /// Returns a handle for inspecting the requests the mock received.
    pub(crate) fn request_handle(&self) -> RequestRecordHandle {
        RequestRecordHandle {
            recorded: self.recorded.clone(),
        }
    }
}

/// Shared handle to a mock provider's recorded requests.
pub(crate) struct RequestRecordHandle {
    recorded: Arc<Mutex<Vec<(String, ChatExchange)>>>,
}

impl RequestRecordHandle {
    /// Returns all recorded `(api_key, exchange)` pairs.
    pub(crate) fn requests(&self) -> Vec<(String, ChatExchange)> {
        self.recorded.lock().unwrap().clone()
    }

    /// Returns the number of outbound calls that were made.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

impl TextGenerationProvider for ConfigurableMockProvider {
    fn send_request<'a>(
        &'a self,
        api_key: &'a str,
        exchange: &'a ChatExchange,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply>> + Send + 'a>> {
        let responses = self.responses.clone();
        let recorded = self.recorded.clone();
        let entry = (api_key.to_string(), exchange.clone());
        Box::pin(async move {
            recorded.lock().unwrap().push(entry);
            responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no more mock responses")))
        })
    }

    fn get_metadata(&self) -> ProviderMetadata {
        self.metadata.clone()
    }
}
