//! Relay server command.

use anyhow::Result;
use clap::Parser;

use crate::config::RelayConfig;

/// Runs the generation relay server.
#[derive(Parser)]
pub struct ServeCommand {
    /// Address to listen on (overrides SHOPCOPY_BIND).
    #[arg(long)]
    pub bind: Option<String>,

    /// Model to request (overrides OPENAI_MODEL).
    #[arg(long)]
    pub model: Option<String>,
}

impl ServeCommand {
    /// Applies command-line overrides on top of loaded configuration.
    pub fn apply(&self, mut config: RelayConfig) -> RelayConfig {
        if let Some(bind) = &self.bind {
            config.bind.clone_from(bind);
        }
        if let Some(model) = &self.model {
            config.model.clone_from(model);
        }
        config
    }

    /// Executes the serve command.
    pub async fn execute(self) -> Result<()> {
        let config = self.apply(RelayConfig::from_env()?);
        crate::server::run(config).await
    }
}
