//! Tablegate command-line entry point.

use clap::Parser;
use tablegate_client::cli::{self, Cli};
use tablegate_client::error::CliError;
use tablegate_client::logging::init_tracing;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\nError: {}\n", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing()?;
    let output = cli::run(cli).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
