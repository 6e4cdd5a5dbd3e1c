mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use war_wikipedia::types::ScrapeError;

#[tokio::main]
async fn main() -> Result<(), ScrapeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("war_wikipedia=info")),
        )
        .init();

    Cli::parse().run().await
}
