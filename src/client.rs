//! Client side: the form controller and the generators it can drive.

pub mod fixture;
pub mod http;

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::relay::{GenerationRequest, GenerationResult};

pub use fixture::SocialPostFixture;
pub use http::RelayClient;

/// Anything that can turn a validated request into a result.
///
/// Failures are values, so callers always have something to render.
pub trait ContentGenerator: Send + Sync {
    /// Runs one generation.
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = GenerationResult> + Send + 'a>>;
}

impl<G: ContentGenerator + ?Sized> ContentGenerator for Box<G> {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = GenerationResult> + Send + 'a>> {
        (**self).generate(request)
    }
}

/// What the form should currently display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// Nothing submitted yet.
    Idle,
    /// A submission is in flight; show a busy indicator.
    Submitting,
    /// Inline error banner.
    Error {
        /// Failure message.
        message: String,
    },
    /// Generated copy with a copy-to-clipboard affordance.
    Success {
        /// Generated text.
        text: String,
    },
}

impl View {
    /// Text placed on the clipboard by the copy button, if shown.
    pub fn copy_text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            _ => None,
        }
    }
}

/// Holds prompt text and the latest result for one user session.
///
/// At most one submission is outstanding at a time: [`begin_submit`]
/// refuses while another is in flight.
///
/// [`begin_submit`]: FormController::begin_submit
pub struct FormController<G> {
    generator: G,
    prompt: String,
    in_flight: bool,
    latest: Option<GenerationResult>,
}

impl<G: ContentGenerator> FormController<G> {
    /// Creates an idle controller.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            prompt: String::new(),
            in_flight: false,
            latest: None,
        }
    }

    /// Current prompt text, untrimmed.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Latest result, if any.
    pub fn latest(&self) -> Option<&GenerationResult> {
        self.latest.as_ref()
    }

    /// Whether the prompt field accepts edits.
    pub fn is_editable(&self) -> bool {
        !self.in_flight
    }

    /// Replaces the prompt text. Returns false, leaving the text unchanged,
    /// while a submission is in flight.
    pub fn set_prompt(&mut self, text: impl Into<String>) -> bool {
        if self.in_flight {
            return false;
        }
        self.prompt = text.into();
        true
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.prompt.trim().is_empty()
    }

    /// Marks a submission as started and returns the request to send.
    pub fn begin_submit(&mut self) -> Option<GenerationRequest> {
        if self.in_flight {
            return None;
        }
        let request = GenerationRequest::new(&self.prompt).ok()?;
        self.in_flight = true;
        Some(request)
    }

    /// Records the result of the in-flight submission.
    ///
    /// Success clears the prompt. Failure keeps it so the user can retry
    /// without re-typing.
    pub fn finish_submit(&mut self, result: GenerationResult) {
        self.in_flight = false;
        if result.is_success() {
            self.prompt.clear();
        }
        debug!(
            success = result.is_success(),
            status = result.status_code(),
            "Submission finished"
        );
        self.latest = Some(result);
    }

    /// Submits the current prompt and waits for the result.
    ///
    /// Returns `None` without contacting the generator when submission is
    /// disabled.
    pub async fn submit(&mut self) -> Option<&GenerationResult> {
        let request = self.begin_submit()?;
        let result = self.generator.generate(&request).await;
        self.finish_submit(result);
        self.latest.as_ref()
    }

    /// Current view.
    pub fn view(&self) -> View {
        if self.in_flight {
            return View::Submitting;
        }
        match &self.latest {
            None => View::Idle,
            Some(GenerationResult::Success(content)) => View::Success {
                text: content.text.clone(),
            },
            Some(GenerationResult::Failure { message, .. }) => View::Error {
                message: message.clone(),
            },
        }
    }
}
