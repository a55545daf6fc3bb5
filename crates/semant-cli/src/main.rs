mod score;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use semant_core::Language;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "semant")]
#[command(about = "Score document sentiment with the Bitext service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score every document in a YAML document set and print the results as JSON
    Score {
        /// Documents file (defaults to SEMANT_DOCUMENTS_PATH)
        #[arg(long)]
        documents: Option<PathBuf>,

        /// Document language, e.g. `en` or `spanish` (defaults to SEMANT_LANGUAGE)
        #[arg(long)]
        language: Option<Language>,

        /// Override the service endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Log the round-trip time of every request
        #[arg(long)]
        debug: bool,

        /// Stop after this many documents have failed (at least 1)
        #[arg(
            long,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        max_failures: Option<usize>,
    },
    /// List the supported languages and their service codes
    Languages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score {
            documents,
            language,
            endpoint,
            debug,
            max_failures,
        } => {
            let config = semant_core::load_app_config()?;
            init_tracing(&config.log_level, config.env.ansi_logs())?;
            score::run_score(
                &config,
                score::ScoreArgs {
                    documents,
                    language,
                    endpoint,
                    debug,
                    max_failures,
                },
            )
            .await?;
        }
        Commands::Languages => {
            for language in Language::ALL {
                println!(
                    "{:<4}{:<12}{}",
                    language.code(),
                    language.name(),
                    language.service_code()
                );
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only the JSON report.
fn init_tracing(log_level: &str, ansi: bool) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .init();
    Ok(())
}
