//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{RelayConfig, Settings};

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the effective configuration with the API key redacted.
    Show(ShowCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let config = RelayConfig::from_env()?;
        let settings_path = Settings::get_settings_path()
            .map_or_else(|_| "<unknown>".to_string(), |p| p.display().to_string());
        println!("{}", describe(&config, &settings_path));
        Ok(())
    }
}

/// Formats configuration for display.
fn describe(config: &RelayConfig, settings_path: &str) -> String {
    format!(
        "settings file: {settings_path}\n\
         api key:       {}\n\
         model:         {}\n\
         api base:      {}\n\
         bind:          {}",
        config.redacted_api_key(),
        config.model,
        config.api_base,
        config.bind
    )
}
