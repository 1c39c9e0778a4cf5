use anyhow::Result;
use clap::Parser;

use epistola::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epistola=info,epistola_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => epistola::cli::run::run(args).await,
        Commands::Metadata {
            paths,
            keep_partial_correspondents,
        } => epistola::cli::metadata::run(&paths, keep_partial_correspondents),
        Commands::Decode { path } => epistola::cli::decode::run(path.as_deref()),
    }
}
