use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use magpie::config::{Config, RunConfig};
use magpie::hashtags::ExtractionMode;
use magpie::model::{DateWindow, SourceId};
use magpie::output;
use magpie::overlap::{self, SubredditStatsClient};
use magpie::pipeline::{self, PipelineDeps};
use magpie::reddit::RedditClient;
use magpie::sources;

/// Magpie: community-overlap driven discourse aggregation.
///
/// Expands a seed subreddit into overlapping communities, harvests them
/// exhaustively, derives a hashtag bank, and fans it out to secondary
/// platforms to build one deduplicated corpus.
#[derive(Parser)]
#[command(name = "magpie", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full aggregation pipeline and write the corpus as JSON
    Collect {
        /// Seed subreddit / topic term
        seed: String,

        /// Secondary sources to fan out to (default: all)
        #[arg(long, value_delimiter = ',')]
        sources: Option<Vec<SourceId>>,

        /// Total primary-platform post target (default: 1000)
        #[arg(long, default_value = "1000")]
        limit: usize,

        /// Inclusive start date (YYYY-MM-DD); overrides --days
        #[arg(long)]
        begin: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD); overrides --days
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Relative lookback window in days (default: 7)
        #[arg(long, default_value = "7")]
        days: i64,

        /// Maximum hashtag bank size (default: 100)
        #[arg(long, default_value = "100")]
        max_terms: usize,

        /// Use noun-frequency extraction instead of TF-IDF weighting
        #[arg(long)]
        nouns: bool,

        /// Overall wall-clock budget in seconds (default: 600)
        #[arg(long, default_value = "600")]
        deadline: u64,

        /// RNG seed for the sampling policy (default: entropy)
        #[arg(long)]
        sample_seed: Option<u64>,

        /// Output path for the corpus JSON (default: corpus.json)
        #[arg(long, default_value = "corpus.json")]
        output: PathBuf,
    },

    /// Show the overlap table for a seed community
    Discover {
        /// Seed subreddit
        seed: String,

        /// How many overlapping communities to list (default: 19)
        #[arg(long, default_value = "19")]
        top_n: usize,
    },

    /// Harvest the seed and print the derived term bank
    Terms {
        /// Seed subreddit
        seed: String,

        /// Primary posts to harvest before extraction (default: 200)
        #[arg(long, default_value = "200")]
        limit: usize,

        /// Maximum hashtag bank size (default: 50)
        #[arg(long, default_value = "50")]
        max_terms: usize,

        /// Use noun-frequency extraction instead of TF-IDF weighting
        #[arg(long)]
        nouns: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("magpie=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Collect {
            seed,
            sources: enabled,
            limit,
            begin,
            end,
            days,
            max_terms,
            nouns,
            deadline,
            sample_seed,
            output,
        } => {
            let mut run_config = RunConfig::for_seed(&seed);
            run_config.primary_quota = limit;
            run_config.max_terms = max_terms;
            run_config.deadline = Duration::from_secs(deadline);
            run_config.window = build_window(begin, end, days)?;
            if nouns {
                run_config.extraction = ExtractionMode::NounFrequency;
            }
            if let Some(enabled) = enabled {
                run_config.sources = enabled;
            }

            let deps = PipelineDeps {
                stats: Box::new(SubredditStatsClient::new(
                    &config.stats_url,
                    &config.user_agent,
                )?),
                reddit: RedditClient::new(&config.reddit_url, &config.user_agent)?,
                collectors: sources::build_collectors(&config, &run_config.sources)?,
            };

            let mut rng = match sample_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let result = pipeline::run(&run_config, &deps, &mut rng).await?;

            let json = serde_json::to_string_pretty(&result)
                .context("Failed to serialize the corpus")?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(path = %output.display(), "Corpus written");

            output::display_summary(&result);
        }

        Commands::Discover { seed, top_n } => {
            let stats = SubredditStatsClient::new(&config.stats_url, &config.user_agent)?;
            let scores = overlap::discover(&stats, &seed, top_n).await?;
            output::display_overlaps(&seed, &scores);
        }

        Commands::Terms {
            seed,
            limit,
            max_terms,
            nouns,
        } => {
            let mut run_config = RunConfig::for_seed(&seed);
            run_config.primary_quota = limit;
            run_config.max_terms = max_terms;
            run_config.sources = Vec::new();
            if nouns {
                run_config.extraction = ExtractionMode::NounFrequency;
            }

            let deps = PipelineDeps {
                stats: Box::new(SubredditStatsClient::new(
                    &config.stats_url,
                    &config.user_agent,
                )?),
                reddit: RedditClient::new(&config.reddit_url, &config.user_agent)?,
                collectors: Vec::new(),
            };

            let mut rng = StdRng::from_os_rng();
            let result = pipeline::run(&run_config, &deps, &mut rng).await?;
            output::display_bank(&result.bank);
        }
    }

    Ok(())
}

/// Resolve the date window from explicit bounds or a relative lookback.
fn build_window(begin: Option<NaiveDate>, end: Option<NaiveDate>, days: i64) -> Result<DateWindow> {
    match (begin, end) {
        (Some(b), Some(e)) => {
            let begin = Utc
                .from_utc_datetime(&b.and_hms_opt(0, 0, 0).context("invalid begin date")?);
            let end = Utc
                .from_utc_datetime(&e.and_hms_opt(23, 59, 59).context("invalid end date")?);
            Ok(DateWindow::new(begin, end)?)
        }
        (None, None) => Ok(DateWindow::last_days(days)),
        _ => anyhow::bail!("--begin and --end must be given together"),
    }
}
