//! Core data model: validated URLs, conference years, author identities,
//! institution classification, and manual-check entries.

mod affiliation;
mod author;
mod manual;
mod url;
mod year;

pub use affiliation::{
    classify_papers, AffiliationClassifier, AffiliationTally, Classification, PaperBreakdown,
    DEFAULT_ACADEMIA_KEYWORDS,
};
pub use author::{AuthorInfo, AuthorMap, AuthorSighting, EmptyIdSetError};
pub use manual::{ManualCheck, ManualCheckList};
pub use url::{InvalidUrlError, ListingUrl, PageUrl};
pub use year::{ConferenceYear, YearCrawl};
