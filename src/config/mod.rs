//! Configuration management.
//!
//! The configuration is loaded once at startup into a [`Config`] value and passed
//! explicitly to the components that need it.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!   "browser": { "path": "/usr/bin/chromium", "window_size": "1920,1080" },
//!   "years": {
//!     "2001": { "base_url": "https://dl.acm.org", "path": "/doi/proceedings/10.1145/383059" },
//!     "2002": { "base_url": "https://dl.acm.org", "path": "/doi/proceedings/10.1145/633025" },
//!     "2021": {
//!       "base_url": "https://dl.acm.org",
//!       "path": "/doi/proceedings/10.1145/3452296",
//!       "tabs": { "param": "tocHeading", "values": ["heading1", "heading2"] }
//!     }
//!   },
//!   "profile_base_url": "https://dl.acm.org",
//!   "affiliation_years": ["2002", "2021"],
//!   "results_dir": "./results"
//! }
//! ```
//!
//! The upper-case layout of the older crawler configuration is accepted as well:
//! `CHROME.PATH` for the browser, and `URL.<year>` entries with `BASE_URL`,
//! `PATH` and `PARAMS: { "tocHeading": [...] }`.
//!
//! Top-level scalar settings can be overridden with `PROCEEDINGS_CENSUS_*`
//! environment variables (e.g. `PROCEEDINGS_CENSUS_RESULTS_DIR`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::{AffiliationClassifier, ConferenceYear};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PROCEEDINGS_CENSUS";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Headless browser settings; without an executable, pages are fetched over plain HTTP
    #[serde(default, alias = "CHROME", alias = "chrome")]
    pub browser: BrowserConfig,

    /// Sites to crawl, keyed by year
    #[serde(default, alias = "URL", alias = "url")]
    pub years: BTreeMap<String, YearSite>,

    /// Base URL for author profile pages (`<base>/profile/<id>`)
    #[serde(default = "default_profile_base_url")]
    pub profile_base_url: String,

    /// Years whose affiliations are collected in an affiliation run
    #[serde(default = "default_affiliation_years")]
    pub affiliation_years: Vec<String>,

    /// Replaces the built-in academia keyword list when set
    #[serde(default)]
    pub academia_keywords: Option<Vec<String>>,

    /// Directory for the JSON result files
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Plain HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            years: BTreeMap::new(),
            profile_base_url: default_profile_base_url(),
            affiliation_years: default_affiliation_years(),
            academia_keywords: None,
            results_dir: default_results_dir(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Add or replace the site configuration for a year.
    pub fn with_year(mut self, year: impl Into<String>, site: YearSite) -> Self {
        self.years.insert(year.into(), site);
        self
    }

    /// Configured years in key order.
    pub fn conference_years(&self) -> Vec<ConferenceYear> {
        self.years
            .iter()
            .map(|(key, site)| ConferenceYear::new(key.clone(), site.clone()))
            .collect()
    }

    pub fn year_keys(&self) -> Vec<String> {
        self.years.keys().cloned().collect()
    }

    pub fn classifier(&self) -> AffiliationClassifier {
        match &self.academia_keywords {
            Some(keywords) => AffiliationClassifier::new(keywords),
            None => AffiliationClassifier::default(),
        }
    }

    /// Check the settings that cannot be defaulted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.is_empty() {
            return Err(ConfigError::NoYears);
        }
        for year in &self.affiliation_years {
            if !self.years.contains_key(year) {
                tracing::warn!("affiliation year {} has no site configuration", year);
            }
        }
        Ok(())
    }
}

/// Site configuration for one conference year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSite {
    #[serde(alias = "BASE_URL")]
    pub base_url: String,

    /// Listing path, resolved against `base_url`
    #[serde(alias = "PATH")]
    pub path: String,

    /// Sub-listings that are not all loaded on the default page
    #[serde(default, alias = "PARAMS", alias = "params")]
    pub tabs: Option<TabParams>,
}

/// Query parameter values that each select one sub-listing.
///
/// Written as `{ "param": "tocHeading", "values": [...] }`, or keyed by the
/// parameter name as `{ "tocHeading": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TabParamsRepr")]
pub struct TabParams {
    pub param: String,
    pub values: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TabParamsRepr {
    Explicit {
        #[serde(default = "default_tab_param")]
        param: String,
        values: Vec<String>,
    },
    Keyed(BTreeMap<String, Vec<String>>),
}

impl TryFrom<TabParamsRepr> for TabParams {
    type Error = String;

    fn try_from(repr: TabParamsRepr) -> Result<Self, Self::Error> {
        match repr {
            TabParamsRepr::Explicit { param, values } => Ok(Self { param, values }),
            TabParamsRepr::Keyed(map) if map.len() == 1 => {
                let (param, values) = map.into_iter().next().ok_or("empty tab parameters")?;
                Ok(Self { param, values })
            }
            TabParamsRepr::Keyed(map) => Err(format!(
                "expected exactly one tab parameter, found {}",
                map.len()
            )),
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome/Chromium executable
    #[serde(default, alias = "PATH")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_window_size")]
    pub window_size: String,

    /// Time the page's scripts get after navigation before the DOM is read
    #[serde(default = "default_render_wait_ms")]
    pub render_wait_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            path: None,
            window_size: default_window_size(),
            render_wait_ms: default_render_wait_ms(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_profile_base_url() -> String {
    "https://dl.acm.org".to_string()
}

fn default_affiliation_years() -> Vec<String> {
    vec!["2002".to_string(), "2021".to_string()]
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_tab_param() -> String {
    "tocHeading".to_string()
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

fn default_render_wait_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("No configuration file found (pass --config or create ./proceedings-census.json)")]
    NotFound,

    #[error("Configuration does not list any years")]
    NoYears,
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Look for a configuration file in the usual places.
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("./proceedings-census.json"),
        PathBuf::from("./config.json"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("proceedings-census").join("config.json"));
    }
    candidates.into_iter().find(|p| p.is_file())
}
