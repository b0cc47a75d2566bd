//! One-shot generation command.

use anyhow::{bail, Result};
use clap::Parser;

use crate::client::{ContentGenerator, FormController, RelayClient, SocialPostFixture, View};
use crate::config::RelayConfig;
use crate::relay::RelayHandler;

/// Generates copy for one prompt and prints it.
#[derive(Parser)]
pub struct GenerateCommand {
    /// Product or post description.
    pub prompt: String,

    /// Submit to a running relay at this base URL instead of calling the
    /// provider in-process.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Use the canned social post generator.
    #[arg(long, conflicts_with = "endpoint")]
    pub social_post: bool,
}

impl GenerateCommand {
    fn generator(&self) -> Result<Box<dyn ContentGenerator>> {
        if self.social_post {
            return Ok(Box::new(SocialPostFixture));
        }
        if let Some(endpoint) = &self.endpoint {
            return Ok(Box::new(RelayClient::new(endpoint)?));
        }
        let config = RelayConfig::from_env()?;
        Ok(Box::new(RelayHandler::from_config(&config)?))
    }

    /// Executes the generate command.
    pub async fn execute(self) -> Result<()> {
        let mut form = FormController::new(self.generator()?);
        form.set_prompt(self.prompt);

        if !form.can_submit() {
            bail!("Prompt is required and cannot be empty");
        }

        eprintln!("Generating your content with AI...");
        form.submit().await;

        match form.view() {
            View::Error { message } => bail!(message),
            view => {
                println!("{}", render(&view));
                Ok(())
            }
        }
    }
}

/// Renders a view as terminal text.
pub fn render(view: &View) -> String {
    match view {
        View::Idle => String::new(),
        View::Submitting => "Generating...".to_string(),
        View::Error { message } => format!("Error: {message}"),
        View::Success { text } => format!("Generated Content\n\n{text}"),
    }
}
