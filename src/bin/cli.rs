//! Forum Pulse CLI
//!
//! Local execution entry point. For scheduled runs on AWS Lambda, use `forum-pulse-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forum_pulse::{
    error::{AppError, Result},
    models::{Config, SinkOutcome, split_list},
    pipeline,
    services::ListingClient,
    storage::{self, DocumentStore},
};

/// Forum Pulse - top engagement posts per community
#[derive(Parser, Debug)]
#[command(
    name = "forum-pulse",
    version,
    about = "Collects the highest-engagement new posts of forum communities"
)]

struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, rank and persist the top posts of every source
    Run {
        /// Comma separated sources overriding the configured list
        #[arg(long)]
        sources: Option<String>,

        /// Items requested per source
        #[arg(long)]
        limit: Option<u32>,

        /// Items kept per source
        #[arg(long)]
        top_n: Option<usize>,

        /// Do not upload to the document store
        #[arg(long)]
        no_upload: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Summarize the last written output file
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the document store from resolved credentials, if any.
#[cfg(feature = "s3")]
fn build_store(config: &Config) -> Option<Box<dyn DocumentStore>> {
    forum_pulse::credentials::resolve(&config.credentials, |key| std::env::var(key).ok()).map(
        |(account, _)| {
            Box::new(storage::S3DocumentStore::from_service_account(&account))
                as Box<dyn DocumentStore>
        },
    )
}

#[cfg(not(feature = "s3"))]
fn build_store(_config: &Config) -> Option<Box<dyn DocumentStore>> {
    log::info!("Built without the `s3` feature, no document store available.");
    None
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Forum Pulse starting...");

    match cli.command {
        Command::Run {
            sources,
            limit,
            top_n,
            no_upload,
        } => {
            let mut config = Config::load_or_default(&cli.config);
            if let Some(sources) = sources {
                config.sources = split_list(&sources);
            }
            if let Some(limit) = limit {
                config.fetcher.limit = limit;
            }
            if let Some(top_n) = top_n {
                config.ranking.top_n = top_n;
            }
            if no_upload {
                config.output.document.enabled = false;
            }
            config.validate()?;

            let store = if config.output.document.enabled {
                build_store(&config)
            } else {
                None
            };
            let client = ListingClient::new(&config.fetcher)?;

            let summary = pipeline::run_pipeline(&config, &client, store.as_deref()).await;

            for (destination, outcome) in &summary.report.outcomes {
                match outcome {
                    SinkOutcome::Written { location } => {
                        log::info!("✓ {} -> {}", destination, location)
                    }
                    SinkOutcome::Skipped { reason } => {
                        log::debug!("- {}: {}", destination, reason)
                    }
                    SinkOutcome::Failed { error } => {
                        log::warn!("✗ {} failed: {}", destination, error)
                    }
                }
            }
            log::info!(
                "Run complete! {} items in {}ms",
                summary.output.item_count(),
                summary.elapsed_ms()
            );
        }

        Command::Validate => {
            log::info!("Validating configuration {}...", cli.config.display());

            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} sources, top {}, {} destinations)",
                config.sources.len(),
                config.ranking.top_n,
                config.destinations().len()
            );
        }

        Command::Info => {
            let config = Config::load_or_default(&cli.config);
            let path = config
                .output
                .files
                .first()
                .ok_or_else(|| AppError::config("No output files configured"))?;

            match storage::read_output(path).await? {
                Some(output) => {
                    log::info!("Output file: {}", path.display());
                    for (source, items) in output.iter() {
                        log::info!("r/{}: {} posts", source, items.len());
                        for (i, item) in items.iter().enumerate() {
                            let posted = item
                                .created_at()
                                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_default();
                            log::info!("    {} {}", posted, item.format_line(i + 1));
                        }
                    }
                }
                None => log::info!("No output found at {} yet.", path.display()),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
