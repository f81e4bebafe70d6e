use anyhow::Result;
use clap::Parser;
use proceedings_census::config::{find_config_file, load_config, ConfigError};
use proceedings_census::utils::ResultStore;
use proceedings_census::{fetcher, pipeline, ui, RunMode};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Proceedings Census - author overlap and affiliation statistics for conference proceedings
#[derive(Parser, Debug)]
#[command(name = "proceedings-census")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crawl conference proceedings and report author overlap and affiliations across years", long_about = None)]
struct Cli {
    /// Collect author maps and print multi-profile and overlap statistics
    #[arg(long)]
    author: bool,

    /// Collect profile affiliations and classify papers as academia or industry
    #[arg(long)]
    affiliation: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the JSON result files (overrides the configuration)
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    /// `--author` wins when both flags are given.
    fn mode(&self) -> Option<RunMode> {
        if self.author {
            Some(RunMode::Author)
        } else if self.affiliation {
            Some(RunMode::Affiliation)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("proceedings_census={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(mode) = cli.mode() else {
        tracing::info!("Nothing to do, pass --author or --affiliation");
        return Ok(());
    };

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => find_config_file().ok_or(ConfigError::NotFound)?,
    };
    tracing::info!("Using config file: {}", config_path.display());

    let mut config = load_config(&config_path)?;
    if let Some(dir) = cli.results_dir {
        config.results_dir = dir;
    }

    let store = ResultStore::new(&config.results_dir);
    let fetcher = fetcher::from_config(&config).await?;
    let outcome = pipeline::run(&config, mode, fetcher.as_ref(), &store).await?;

    if !cli.quiet {
        ui::print_outcome(&outcome);
    }

    Ok(())
}
