//! Utility modules supporting the crawl.
//!
//! - [`HttpClient`]: shared reqwest client with the configured user agent and timeouts
//! - [`ResultStore`]: JSON result files, including the author cache

mod http;
mod store;

pub use http::HttpClient;
pub use store::{
    InstitutionCounts, PaperAffiliations, ResultStore, StoreError, AUTHOR_INFO_FILE,
    MANUAL_INFO_FILE, OTHER_INFO_FILE, PAPER_AFFILIATIONS_FILE, UNIVERSITIES_FILE,
    UNIVERSITY_INFO_FILE,
};
