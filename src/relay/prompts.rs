//! Fixed prompt template for marketing copy generation.

use crate::ai::{ChatExchange, GenerationParams};
use crate::relay::GenerationRequest;

/// System instruction fixing the assistant's persona and output style.
pub const SYSTEM_PROMPT: &str = "You are an experienced e-commerce marketing copywriter. \
You write product descriptions, promotional copy and social media posts for online stores.

Turn the merchant's input into copy that is:
- engaging and persuasive
- written to convert browsers into buyers
- professional but approachable
- reusable across product pages, social posts and email campaigns
- clear and easy to scan

Reply with clean, well-structured text that can be pasted straight into marketing material.";

/// Sampling parameters for every generation. Not configurable per request.
pub const COPYWRITER_PARAMS: GenerationParams = GenerationParams {
    max_tokens: 500,
    temperature: 0.7,
    top_p: 1.0,
    frequency_penalty: 0.0,
    presence_penalty: 0.0,
};

/// Builds the system + user exchange for a validated request.
pub fn build_exchange(request: &GenerationRequest) -> ChatExchange {
    ChatExchange {
        system: SYSTEM_PROMPT.to_string(),
        user: request.prompt().to_string(),
        params: COPYWRITER_PARAMS,
    }
}
