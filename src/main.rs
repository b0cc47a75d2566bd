use std::process;

use clap::Parser;
use shopcopy::Cli;

#[tokio::main]
async fn main() {
    // RUST_LOG controls verbosity, defaulting to "info" so the relay's
    // request diagnostics are visible. Logs go to stderr; generated copy goes
    // to stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}
