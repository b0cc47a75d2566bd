//! CLI interface for shopcopy.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod config;
pub mod generate;
pub mod serve;

/// shopcopy: AI marketing copy for your store.
#[derive(Parser)]
#[command(name = "shopcopy")]
#[command(about = "AI marketing copy generator for e-commerce products", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Runs the generation relay server.
    Serve(serve::ServeCommand),
    /// Generates copy for one prompt and prints it.
    Generate(generate::GenerateCommand),
    /// Configuration information.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(cmd) => cmd.execute().await,
            Commands::Generate(cmd) => cmd.execute().await,
            Commands::Config(cmd) => cmd.execute(),
        }
    }
}
