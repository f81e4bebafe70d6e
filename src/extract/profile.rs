//! Institutions listed on an author profile page.

use scraper::{Html, Selector};
use std::sync::OnceLock;

use super::{first_text, selector, ExtractError};
use crate::models::PageUrl;

struct ProfileSelectors {
    title: Selector,
    institution_list: Selector,
    institutions: Selector,
}

fn selectors() -> &'static ProfileSelectors {
    static SELECTORS: OnceLock<ProfileSelectors> = OnceLock::new();
    SELECTORS.get_or_init(|| ProfileSelectors {
        title: selector("h1.title"),
        institution_list: selector("ul.list-of-institutions"),
        institutions: selector("ul.list-of-institutions a"),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileAffiliations {
    pub name: String,
    /// Lower-cased, one entry per listed institution (not deduplicated)
    pub institutions: Vec<String>,
}

/// Read the display name and institution list of a profile page.
///
/// Both the `h1.title` heading and the `ul.list-of-institutions` list must be
/// present; the list may be empty.
pub fn extract_profile(
    document: &Html,
    profile_url: &PageUrl,
) -> Result<ProfileAffiliations, ExtractError> {
    let selectors = selectors();

    let name = document
        .select(&selectors.title)
        .next()
        .and_then(first_text)
        .ok_or_else(|| ExtractError::MissingMarker {
            marker: "h1.title",
            url: profile_url.to_string(),
        })?;

    if document.select(&selectors.institution_list).next().is_none() {
        return Err(ExtractError::MissingMarker {
            marker: "ul.list-of-institutions",
            url: profile_url.to_string(),
        });
    }

    let institutions = document
        .select(&selectors.institutions)
        .filter_map(first_text)
        .map(|institution| institution.to_lowercase())
        .collect();

    Ok(ProfileAffiliations { name, institutions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_url() -> PageUrl {
        PageUrl::parse("https://dl.acm.org/profile/81100000001").unwrap()
    }

    #[test]
    fn test_extract_profile() {
        let html = Html::parse_document(
            r#"<html><body>
               <h1 class="title">Alice Smith</h1>
               <ul class="list-of-institutions">
                 <li><a href="/institution/1">Massachusetts Institute of Technology</a></li>
                 <li><a href="/institution/2">Acme   Corp</a></li>
                 <li><a href="/institution/1">Massachusetts Institute of Technology</a></li>
               </ul>
               </body></html>"#,
        );

        let profile = extract_profile(&html, &profile_url()).unwrap();
        assert_eq!(profile.name, "Alice Smith");
        assert_eq!(
            profile.institutions,
            vec![
                "massachusetts institute of technology",
                "acme corp",
                "massachusetts institute of technology"
            ]
        );
    }

    #[test]
    fn test_missing_institution_list() {
        let html = Html::parse_document(r#"<h1 class="title">Bob</h1>"#);
        let err = extract_profile(&html, &profile_url()).unwrap_err();
        assert_eq!(
            err,
            ExtractError::MissingMarker {
                marker: "ul.list-of-institutions",
                url: profile_url().to_string(),
            }
        );
    }

    #[test]
    fn test_missing_title() {
        let html = Html::parse_document(r#"<ul class="list-of-institutions"></ul>"#);
        assert!(matches!(
            extract_profile(&html, &profile_url()),
            Err(ExtractError::MissingMarker { marker: "h1.title", .. })
        ));
    }
}
