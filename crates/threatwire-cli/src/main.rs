use clap::{Parser, Subcommand};
use serde::Serialize;
use threatwire_pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "threatwire-cli")]
#[command(about = "Threatwire pipeline command line interface")]
struct Cli {
    /// Print compact single-line JSON instead of pretty-printed output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once and print the run report
    Run,
    /// List stored articles, newest first
    List,
    /// Delete every stored article
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = threatwire_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = Pipeline::from_config(&config)?;

    match cli.command {
        Commands::Run => {
            let report = pipeline.run_once().await;
            tracing::info!(
                stored = report.articles_succeeded,
                failed = report.articles_failed,
                duplicates = report.articles_skipped_duplicate,
                feeds_failed = report.feeds_failed,
                "pipeline run complete"
            );
            print_json(&report, cli.compact)?;
        }
        Commands::List => print_json(&pipeline.list_articles().await?, cli.compact)?,
        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!(
                    "refusing to delete stored articles in {} without --yes",
                    config.storage_dir.display()
                );
            }
            let report = pipeline.clear_articles().await?;
            tracing::info!(
                deleted = report.deleted_count,
                failed = report.failures.len(),
                "stored articles cleared"
            );
            print_json(&report, cli.compact)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}
