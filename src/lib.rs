//! # shopcopy
//!
//! Generates marketing copy for e-commerce products by relaying a merchant's
//! prompt to a chat-completion API.
//!
//! ## Layout
//!
//! - [`relay`]: validates a prompt, calls the provider once, normalizes the
//!   outcome into a [`relay::GenerationResult`]
//! - [`ai`]: the [`ai::TextGenerationProvider`] seam and its OpenAI client
//! - [`server`]: the `/api/generate` HTTP route
//! - [`client`]: the form controller and the generators it can drive
//!
//! ## Quick Start
//!
//! ```no_run
//! use shopcopy::client::{FormController, View};
//! use shopcopy::config::RelayConfig;
//! use shopcopy::relay::RelayHandler;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = RelayConfig::from_env()?;
//! let mut form = FormController::new(RelayHandler::from_config(&config)?);
//! form.set_prompt("A premium wireless headphone with noise cancellation");
//! form.submit().await;
//! if let View::Success { text } = form.view() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ai;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod relay;
pub mod server;

pub use crate::cli::Cli;
pub use crate::error::{ProviderError, RelayError};

/// The current version of shopcopy.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
