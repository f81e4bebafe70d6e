//! The crawl pipeline.
//!
//! [`crawl_year`] produces one [`YearCrawl`](crate::models::YearCrawl) per
//! conference year. [`collect_author_info`] and [`collect_affiliations`] combine
//! the years, persist results through the
//! [`ResultStore`](crate::utils::ResultStore), and hand back what the report
//! needs. [`run`] ties a run mode to a fetcher and always releases the fetcher.

mod census;
mod crawl;

pub use census::{collect_affiliations, collect_author_info, AffiliationReport, AuthorCensus};
pub use crawl::crawl_year;

use crate::analytics::AuthorReport;
use crate::config::{Config, ConfigError};
use crate::extract::ExtractError;
use crate::fetcher::{FetchError, PageFetcher};
use crate::models::InvalidUrlError;
use crate::utils::{ResultStore, StoreError};

/// Top-level error for a census run
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrlError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a run collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Author maps and cross-year overlap analytics
    Author,
    /// Profile institution counts and per-paper academia/industry split
    Affiliation,
}

/// Result of a completed run, ready for printing.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Author {
        census: AuthorCensus,
        report: AuthorReport,
    },
    Affiliation(AffiliationReport),
}

/// Execute one run.
///
/// The fetcher is closed afterwards whether or not the run succeeded; a close
/// failure is logged and does not override the run's own result.
pub async fn run(
    config: &Config,
    mode: RunMode,
    fetcher: &dyn PageFetcher,
    store: &ResultStore,
) -> Result<RunOutcome, CensusError> {
    tracing::info!("starting {:?} run with the {} fetcher", mode, fetcher.id());

    let outcome = match mode {
        RunMode::Author => collect_author_info(config, fetcher, store)
            .await
            .map(|census| {
                let report = AuthorReport::build(&census.info, &config.year_keys());
                RunOutcome::Author { census, report }
            }),
        RunMode::Affiliation => collect_affiliations(config, fetcher, store)
            .await
            .map(RunOutcome::Affiliation),
    };

    if let Err(e) = fetcher.close().await {
        tracing::warn!("Failed to close {} fetcher: {}", fetcher.id(), e);
    }

    outcome
}
