//! One year of crawling: listings, then every article in discovery order.

use scraper::Html;

use crate::extract::{extract_article_links, extract_authors, extract_institutions, partition};
use crate::fetcher::PageFetcher;
use crate::models::{ConferenceYear, ManualCheck, PageUrl, YearCrawl};

/// Crawl one conference year.
///
/// Never fails as a whole: a fatal error (bad listing URL, fetch failure, a
/// listing without markers) stops the year, is stored in
/// [`YearCrawl::failure`], and whatever was gathered up to then is kept.
/// Item-level problems end up in [`YearCrawl::manual`].
pub async fn crawl_year(fetcher: &dyn PageFetcher, year: &ConferenceYear) -> YearCrawl {
    let mut crawl = YearCrawl::new(year.key());
    tracing::info!("processing {} event...", year.key());

    if let Err(e) = crawl_into(fetcher, year, &mut crawl).await {
        tracing::error!("Exception while crawling {}: {}", year.key(), e);
        crawl.failure = Some(e.to_string());
    }

    tracing::info!(
        "{}: {} article(s), {} author(s), {} manual check(s){}",
        crawl.year,
        crawl.article_links.len(),
        crawl.authors.len(),
        crawl.manual.len(),
        if crawl.is_complete() { "" } else { " (incomplete)" }
    );
    crawl
}

async fn crawl_into(
    fetcher: &dyn PageFetcher,
    year: &ConferenceYear,
    crawl: &mut YearCrawl,
) -> Result<(), super::CensusError> {
    let listings = year.listing_urls()?;
    for listing in &listings {
        tracing::info!("digital library url: {}", listing);
    }

    for listing in &listings {
        let html = fetcher.fetch(listing).await?;
        let links = {
            let document = Html::parse_document(&html);
            extract_article_links(&document, listing)?
        };
        crawl.article_links.extend(links.links);
    }

    let links = crawl.article_links.clone();
    for link in &links {
        let article_url = match year.article_url(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("skipping article link {}: {}", link, e);
                crawl.manual.push(ManualCheck::new(link.as_str(), e.to_string()));
                continue;
            }
        };

        let html = fetcher.fetch(&article_url).await?;
        absorb_article(crawl, link, &article_url, &html);
    }

    Ok(())
}

/// Fold one article page into the year record.
///
/// A page without an authors list is recorded for manual checking and adds
/// nothing else. Authors or institutions that cannot be read are recorded for
/// manual checking too, and the rest of the page is kept.
pub(crate) fn absorb_article(crawl: &mut YearCrawl, link: &str, article_url: &PageUrl, html: &str) {
    let document = Html::parse_document(html);

    let entries = match extract_authors(&document, article_url) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("please manually investigate {}: {}", article_url, e);
            crawl
                .manual
                .push(ManualCheck::new(article_url.as_str(), e.to_string()));
            return;
        }
    };

    let (sightings, skipped) = partition(entries);
    crawl.authors.extend(sightings);
    crawl.manual.extend(skipped);

    // the authors list is known to exist at this point
    if let Ok(entries) = extract_institutions(&document, article_url) {
        let (institutions, skipped) = partition(entries);
        crawl.manual.extend(skipped);
        crawl
            .article_institutions
            .entry(link.to_string())
            .or_default()
            .extend(institutions);
    }
}
