//! Taskweave CLI binary.

use anyhow::Result;
use taskweave::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the taskweave CLI.
///
/// Uses tokio's current_thread runtime; commands run one storage operation
/// at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=taskweave=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskweave=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting taskweave CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Taskweave CLI completed successfully");
    Ok(())
}
