//! # Proceedings Census
//!
//! Crawls a digital library's conference-proceedings pages for several years,
//! extracts author identities and affiliations, and reports how the author
//! population overlaps across years and how it splits between academia and
//! industry.
//!
//! ## Architecture
//!
//! - [`models`]: Validated URLs, author maps, affiliation tallies, per-year crawl records
//! - [`config`]: Configuration loading
//! - [`fetcher`]: The [`PageFetcher`] trait and its browser, HTTP, and mock implementations
//! - [`extract`]: HTML extraction for listing, article, and profile pages
//! - [`pipeline`]: Per-year crawling and the author and affiliation runs
//! - [`analytics`]: Multi-profile detection and cross-year overlap statistics
//! - [`utils`]: HTTP client and the JSON result store
//! - [`ui`]: Terminal report

pub mod analytics;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use fetcher::PageFetcher;
pub use pipeline::{run, CensusError, RunMode, RunOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
