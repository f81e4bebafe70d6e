//! Whole-run collection: the author census and the affiliation census.

use scraper::Html;
use std::collections::BTreeMap;

use super::crawl::crawl_year;
use super::CensusError;
use crate::config::Config;
use crate::extract::{extract_profile, ProfileAffiliations};
use crate::fetcher::PageFetcher;
use crate::models::{
    classify_papers, AffiliationClassifier, AffiliationTally, AuthorInfo, Classification,
    ManualCheck, ManualCheckList, PageUrl, PaperBreakdown, YearCrawl,
};
use crate::utils::{PaperAffiliations, ResultStore};

/// Author maps for every configured year, plus how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct AuthorCensus {
    pub info: AuthorInfo,
    /// Set when `author_info.json` was reused and nothing was fetched
    pub from_cache: bool,
    /// Per-year crawl records of this run; empty when served from cache
    pub crawls: BTreeMap<String, YearCrawl>,
    pub manual: ManualCheckList,
}

impl AuthorCensus {
    /// year → failure message for years cut short during this run
    pub fn failures(&self) -> BTreeMap<String, String> {
        self.crawls
            .iter()
            .filter_map(|(year, crawl)| crawl.failure.clone().map(|f| (year.clone(), f)))
            .collect()
    }
}

/// Load the persisted author maps, or crawl every configured year and persist them.
///
/// An existing `author_info.json` short-circuits the crawl: the fetcher is not
/// called at all. Years that fail still contribute what they gathered.
pub async fn collect_author_info(
    config: &Config,
    fetcher: &dyn PageFetcher,
    store: &ResultStore,
) -> Result<AuthorCensus, CensusError> {
    if let Some(info) = store.load_authors()? {
        tracing::info!(
            "reusing {} ({} year(s)), skipping the author crawl",
            store.path(crate::utils::AUTHOR_INFO_FILE).display(),
            info.len()
        );
        return Ok(AuthorCensus {
            info,
            from_cache: true,
            ..AuthorCensus::default()
        });
    }

    let mut census = AuthorCensus::default();
    for year in config.conference_years() {
        let crawl = crawl_year(fetcher, &year).await;
        census.info.insert(crawl.year.clone(), crawl.authors.clone());
        census.manual.extend(crawl.manual.iter().cloned());
        census.crawls.insert(crawl.year.clone(), crawl);
    }

    let failures = census.failures();
    if !failures.is_empty() {
        tracing::warn!(
            "saving partial author data, incomplete year(s): {}",
            failures.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    tracing::debug!("dumping author_info to json output");
    store.save_authors(&census.info)?;
    store.record_manual(&census.manual)?;
    Ok(census)
}

/// Everything produced by an affiliation run.
#[derive(Debug, Clone, Default)]
pub struct AffiliationReport {
    /// Profile-based institution counts
    pub tally: AffiliationTally,
    /// year → academia-only vs industry-involved papers
    pub papers: BTreeMap<String, PaperBreakdown>,
    /// Every matched academic institution string, in the order seen
    pub universities: Vec<String>,
    pub paper_affiliations: PaperAffiliations,
    pub manual: ManualCheckList,
}

/// Count the institutions on every author profile of the affiliation years,
/// then classify each paper of those years by its institutions.
///
/// A profile that cannot be fetched or parsed is recorded for manual checking.
/// Article institutions come from this run's crawl when there was one, and are
/// crawled again otherwise.
pub async fn collect_affiliations(
    config: &Config,
    fetcher: &dyn PageFetcher,
    store: &ResultStore,
) -> Result<AffiliationReport, CensusError> {
    let census = collect_author_info(config, fetcher, store).await?;
    let classifier = config.classifier();
    let mut report = AffiliationReport::default();

    for year in &config.affiliation_years {
        report.tally.ensure_year(year);
        let Some(authors) = census.info.get(year) else {
            tracing::warn!("no author data for {}, skipping profiles", year);
            continue;
        };

        for id in authors.all_ids() {
            let profile_url = match profile_url(&config.profile_base_url, &id) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("!!manual check => {}", e);
                    report.manual.push(ManualCheck::new(
                        format!("{}/profile/{}", config.profile_base_url, id),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            match fetch_profile(fetcher, &profile_url).await {
                Ok(profile) => {
                    tracing::info!("author id is: {}, name is {}", id, profile.name);
                    tally_profile(&classifier, &mut report.tally, year, &profile);
                }
                Err(e) => {
                    tracing::warn!("!!manual check => {} ({})", profile_url, e);
                    report
                        .manual
                        .push(ManualCheck::new(profile_url.as_str(), e.to_string()));
                }
            }
        }
    }

    for year in config.conference_years() {
        if !config.affiliation_years.iter().any(|y| y == year.key()) {
            continue;
        }
        let crawl = match census.crawls.get(year.key()) {
            Some(crawl) => crawl.clone(),
            None => {
                let crawl = crawl_year(fetcher, &year).await;
                report.manual.extend(crawl.manual.iter().cloned());
                crawl
            }
        };

        let breakdown = classify_papers(
            &classifier,
            &crawl.article_institutions,
            &mut report.universities,
        );
        tracing::info!("The total number of papers in {} is {}", year.key(), breakdown.total);
        tracing::info!("Academia paper in {}: {}", year.key(), breakdown.academia_only);
        tracing::info!(
            "Industry involved papers in {}: {}",
            year.key(),
            breakdown.industry_involved()
        );
        report.papers.insert(year.key().to_string(), breakdown);
        report
            .paper_affiliations
            .insert(year.key().to_string(), crawl.article_institutions);
    }

    store.save_university_info(&report.tally.by_class(Classification::Academia))?;
    store.save_other_info(&report.tally.by_class(Classification::Other))?;
    store.record_manual(&report.manual)?;
    store.save_universities(&report.universities)?;
    store.save_paper_affiliations(&report.paper_affiliations)?;

    Ok(report)
}

fn profile_url(base: &str, id: &str) -> Result<PageUrl, CensusError> {
    let base = PageUrl::parse(base.trim_end_matches('/'))?;
    Ok(PageUrl::parse(format!("{}/profile/{}", base, urlencoding::encode(id)))?)
}

async fn fetch_profile(
    fetcher: &dyn PageFetcher,
    profile_url: &PageUrl,
) -> Result<ProfileAffiliations, CensusError> {
    let html = fetcher.fetch(profile_url).await?;
    let document = Html::parse_document(&html);
    Ok(extract_profile(&document, profile_url)?)
}

fn tally_profile(
    classifier: &AffiliationClassifier,
    tally: &mut AffiliationTally,
    year: &str,
    profile: &ProfileAffiliations,
) {
    for institution in &profile.institutions {
        let class = classifier.classify(institution);
        let count = tally.record(year, institution, class);
        tracing::debug!("{} {} {} count is {}", year, class, institution, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url() {
        assert_eq!(
            profile_url("https://dl.acm.org/", "81100000001").unwrap().as_str(),
            "https://dl.acm.org/profile/81100000001"
        );
        assert_eq!(
            profile_url("https://dl.acm.org", "a b/c").unwrap().as_str(),
            "https://dl.acm.org/profile/a%20b%2Fc"
        );
        assert!(profile_url("dl.acm.org", "1").is_err());
    }

    #[test]
    fn test_tally_profile_counts_every_occurrence() {
        let classifier = AffiliationClassifier::default();
        let mut tally = AffiliationTally::new();
        let profile = ProfileAffiliations {
            name: "Alice Smith".to_string(),
            institutions: vec![
                "massachusetts institute of technology".to_string(),
                "acme corp".to_string(),
                "massachusetts institute of technology".to_string(),
            ],
        };

        tally_profile(&classifier, &mut tally, "2002", &profile);

        assert_eq!(
            tally.count(
                "2002",
                Classification::Academia,
                "massachusetts institute of technology"
            ),
            2
        );
        assert_eq!(tally.count("2002", Classification::Other, "acme corp"), 1);
        assert_eq!(tally.total("2021", Classification::Other), 0);
    }
}
