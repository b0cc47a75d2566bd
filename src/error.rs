//! Error types for the relay and its providers.

use thiserror::Error;

/// Errors raised by a text-generation provider.
///
/// Providers return these wrapped in `anyhow::Error`; the relay downcasts
/// to this type to decide how a failure is reported to the client.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{provider} API error: {message}")]
    ApiRequestFailed {
        /// Provider display name.
        provider: String,
        /// Message from the provider's error payload, or the status reason.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("{provider} API error: {message}")]
    NetworkError {
        /// Provider display name.
        provider: String,
        /// Transport error text.
        message: String,
    },

    /// A success response whose body could not be decoded.
    #[error("Invalid response format from provider: {0}")]
    InvalidResponseFormat(String),
}

/// Failure classes of a single relay invocation.
///
/// Every variant maps to an HTTP status and a human-readable message that is
/// sent to the client as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The request used a method other than POST.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The prompt was missing, malformed or blank.
    #[error("Prompt is required and cannot be empty")]
    InvalidInput,

    /// The form body exceeded the accepted size.
    #[error("Prompt is too large")]
    PayloadTooLarge,

    /// No provider credential is configured.
    #[error("OpenAI API key not configured")]
    ConfigurationMissing,

    /// The provider call failed; carries the client-facing message.
    #[error("{0}")]
    ProviderError(String),

    /// The provider succeeded but returned no usable text.
    #[error("No content was generated")]
    EmptyGeneration,

    /// Anything else.
    #[error("An unexpected error occurred while generating content")]
    Unexpected,
}

impl RelayError {
    /// HTTP status code reported for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::InvalidInput => 400,
            Self::PayloadTooLarge => 413,
            Self::ConfigurationMissing
            | Self::ProviderError(_)
            | Self::EmptyGeneration
            | Self::Unexpected => 500,
        }
    }

    /// Classifies an error returned by a provider.
    ///
    /// Provider API and transport failures keep their message; decode
    /// failures and foreign errors collapse into [`RelayError::Unexpected`].
    pub fn from_provider(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ProviderError>() {
            Some(e @ (ProviderError::ApiRequestFailed { .. } | ProviderError::NetworkError { .. })) => {
                Self::ProviderError(e.to_string())
            }
            Some(ProviderError::InvalidResponseFormat(_)) | None => Self::Unexpected,
        }
    }
}
