//! anime-curator: scrape a catalog, filter it in stages and tag the
//! survivors with an AI classifier.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anime_curator::classifier::OpenAiClassifier;
use anime_curator::config::Config;
use anime_curator::filters::traits::DEFAULT_MIN_AGE;
use anime_curator::stages::{self, AnnotateOptions, ScrapeOptions};

#[derive(Parser)]
#[command(name = "anime-curator")]
#[command(about = "Anime catalog scraper and multi-stage filter")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download catalog pages and build the raw database
    Scrape {
        #[arg(short, long, default_value = "anime_links.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "anime_database.json")]
        output: PathBuf,
        /// Process at most this many links
        #[arg(short, long)]
        limit: Option<usize>,
        /// Skip this many links from the start of the list
        #[arg(long, default_value = "0")]
        skip_first: usize,
        /// Pause between downloads in milliseconds (overrides REQUEST_DELAY_MS)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Successful pages between snapshots, 0 disables (overrides CHECKPOINT_INTERVAL)
        #[arg(long)]
        checkpoint_interval: Option<usize>,
    },

    /// Decode attributes and drop non-series, sequels, low scores
    Basic {
        #[arg(short, long, default_value = "anime_database.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "anime_simplified.json")]
        output: PathBuf,
        /// Minimum score (overrides MIN_SCORE)
        #[arg(long)]
        min_score: Option<f64>,
    },

    /// Keep romance titles, drop excluded genres and themes
    Genres {
        #[arg(short, long, default_value = "anime_simplified.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "anime_romance.json")]
        output: PathBuf,
    },

    /// Tag every record with the AI classifier
    Annotate {
        #[arg(short, long, default_value = "anime_romance.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "anime_annotated.json")]
        output: PathBuf,
        /// Pause between classifier calls in milliseconds (overrides CLASSIFY_DELAY_MS)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Keep records whose tags describe an adult romance with a female lead
    Final {
        #[arg(short, long, default_value = "anime_annotated.json")]
        input: PathBuf,
        #[arg(short, long, default_value = "anime_final.json")]
        output: PathBuf,
        /// Minimum lower bound of the lead's age
        #[arg(long, default_value_t = DEFAULT_MIN_AGE)]
        min_age: i64,
    },
}

/// Check if verbose mode is enabled before the parser runs.
fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let default_filter = if is_verbose() {
        "anime_curator=debug"
    } else {
        "anime_curator=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Scrape {
            input,
            output,
            limit,
            skip_first,
            delay_ms,
            checkpoint_interval,
        } => {
            if let Some(ms) = delay_ms {
                config = config.with_request_delay(Duration::from_millis(ms));
            }
            if let Some(interval) = checkpoint_interval {
                config = config.with_checkpoint_interval(interval);
            }
            let options = ScrapeOptions {
                limit,
                skip_first,
                delay: config.request_delay(),
                checkpoint_interval: config.checkpoint_interval(),
                ..ScrapeOptions::default()
            };

            let shutdown = CancellationToken::new();
            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Ctrl-C received, finishing the current page");
                    signal_token.cancel();
                }
            });

            let report = stages::run_scrape(&input, &output, &options, shutdown)
                .await
                .with_context(|| format!("Scrape failed for {}", input.display()))?;
            println!("{}", report);
        }
        Commands::Basic {
            input,
            output,
            min_score,
        } => {
            if let Some(min_score) = min_score {
                config = config
                    .with_min_score(min_score)
                    .context("Invalid --min-score")?;
            }
            let report = stages::run_basic(&input, &output, config.min_score())?;
            println!("{}", report);
        }
        Commands::Genres { input, output } => {
            let report = stages::run_genres(&input, &output, config.genre_rules())?;
            println!("{}", report);
        }
        Commands::Annotate {
            input,
            output,
            delay_ms,
        } => {
            let classifier = OpenAiClassifier::new(config.openai_api_key().map(str::to_string))
                .with_base_url(config.openai_base_url())
                .with_model(config.openai_model());
            if config.openai_api_key().is_none() {
                warn!("OPENAI_API_KEY is not set, every record will get the fallback tags");
            }
            info!("Classifying with model {}", classifier.model());

            if let Some(ms) = delay_ms {
                config = config.with_classify_delay(Duration::from_millis(ms));
            }
            let options = AnnotateOptions {
                delay: config.classify_delay(),
                checkpoint_interval: config.classify_checkpoint_interval(),
            };
            let report = stages::run_annotate(&input, &output, &classifier, &options).await?;
            println!("{}", report);
        }
        Commands::Final {
            input,
            output,
            min_age,
        } => {
            let report = stages::run_final(&input, &output, min_age)?;
            println!("{}", report);
        }
    }

    Ok(())
}
