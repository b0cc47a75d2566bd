//! Canned generator for the social post composer.
//!
//! The social post flow has no backend contract yet, so this returns a fixed
//! caption and hashtag set without touching the network.

use std::future::Future;
use std::pin::Pin;

use super::ContentGenerator;
use crate::relay::{GeneratedContent, GenerationRequest, GenerationResult};

/// Model identifier reported by the fixture.
pub const FIXTURE_MODEL: &str = "social-post-fixture";

const CAPTION: &str = "Meet your new favourite find. Made to stand out, built to last, \
and ready to ship today. Tap the link in bio before it sells out!";

const HASHTAGS: &[&str] = &[
    "#shopsmall",
    "#newarrivals",
    "#musthave",
    "#giftideas",
    "#shoponline",
];

/// Returns canned social post copy for any prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct SocialPostFixture;

impl SocialPostFixture {
    /// The caption and hashtags, as displayed.
    pub fn post_text() -> String {
        format!("{CAPTION}\n\n{}", HASHTAGS.join(" "))
    }
}

impl ContentGenerator for SocialPostFixture {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = GenerationResult> + Send + 'a>> {
        Box::pin(async move {
            GenerationResult::Success(GeneratedContent {
                text: Self::post_text(),
                prompt: request.prompt().to_string(),
                model: FIXTURE_MODEL.to_string(),
                usage: None,
            })
        })
    }
}
