// FeelScope command-line front end.
// Each subcommand maps to one UI action; session state lives for the run.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use feelscope_core::models::{CanonicalResult, Mode, Source};
use feelscope_core::providers::{BatchAnalyzer, GeminiClient, HttpBackend, ProviderRouter};
use feelscope_core::telemetry::{self, LogFormat};
use feelscope_core::{AnalysisState, AppConfig};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "feelscope")]
#[command(about = "Sentiment, emotion and topic analysis")]
struct Cli {
    /// Backend base URL (or set FEELSCOPE_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one text
    Analyze {
        text: String,
        /// Use the remote generative model instead of the local provider
        #[arg(long)]
        online: bool,
    },
    /// Classify one text with the basic keyword classifier
    Basic { text: String },
    /// Fetch a subreddit's hot posts and classify each one
    Reddit { subreddit: String },
    /// List persisted analyses
    History {
        /// Print sentiment buckets instead of the records
        #[arg(long)]
        stats: bool,
    },
    /// Delete all persisted analyses
    ClearHistory,
    /// Print chart data
    Chart {
        /// Compute from history for one source instead of asking the backend
        #[arg(long, value_enum)]
        source: Option<SourceArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Remote,
    Local,
    Social,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Remote => Source::Remote,
            SourceArg::Local => Source::Local,
            SourceArg::Social => Source::Social,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_result(result: Option<&CanonicalResult>) -> Result<()> {
    match result {
        Some(result) => {
            info!(badge = result.sentiment.badge(), "Sentiment: {}", result.sentiment);
            print_json(result)
        }
        None => bail!("No analysis result available; the provider reported an error"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init(LogFormat::from_env())?;

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Invalid configuration")?;
    if let Some(url) = cli.backend_url {
        config = config.with_backend_url(url).context("Invalid --backend-url")?;
    }
    info!("Configuration: {:?}", config);

    let backend = Arc::new(HttpBackend::from_config(&config)?);
    let generator = match GeminiClient::from_config(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!("Online mode disabled: {}", e);
            None
        }
    };
    let router = ProviderRouter::new(generator, backend.clone());
    let mut state = AnalysisState::new();

    match cli.command {
        Command::Analyze { text, online } => {
            let mode = if online { Mode::Online } else { Mode::Offline };
            let result = router.analyze(&mut state, &text, mode).await?;
            print_result(result.as_ref())?;
        }
        Command::Basic { text } => {
            let result = router.analyze_basic(&mut state, &text).await?;
            print_result(result.as_ref())?;
        }
        Command::Reddit { subreddit } => {
            let analyzer = BatchAnalyzer::new(backend);
            let report = analyzer.analyze_subreddit(&subreddit).await?;
            print_json(&report)?;
            print_json(&report.stats())?;
        }
        Command::History { stats } => {
            router.refresh_history(&mut state).await?;
            if stats {
                print_json(&state.history_stats())?;
            } else {
                print_json(&state.history)?;
            }
        }
        Command::ClearHistory => {
            if !router.clear_history(&mut state).await? {
                bail!("Backend refused to clear history");
            }
            println!("History cleared");
        }
        Command::Chart { source } => match source {
            Some(source) => {
                router.refresh_history(&mut state).await?;
                print_json(&state.history_chart(Some(source.into())))?;
            }
            None => {
                router.refresh_chart(&mut state).await;
                match &state.chart {
                    Some(chart) => print_json(chart)?,
                    None => bail!("Chart data unavailable"),
                }
            }
        },
    }

    Ok(())
}
