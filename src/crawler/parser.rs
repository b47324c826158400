//! HTML parsers for the two page kinds the crawl visits
//!
//! - Search results pages: yield the links to individual job listings
//! - Job detail pages: yield title, company, technology tags and description
//!
//! Both parsers are pure functions of the page body, so a page can be
//! re-parsed at any time (e.g. after a retried fetch).

use crate::ParseError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Job links inside the search results list
const JOB_LINK_SELECTOR: &str = ".js-search-results .listResults .job-details__spaced a.job-link";

/// Anchor inside the page heading holding the job title
const POSITION_SELECTOR: &str = "h1 > a";

/// Anchor inside the block that follows the heading, holding the company name
const COMPANY_SELECTOR: &str = "h1 ~ div > a";

/// Technology tag links on a detail page
const TAG_SELECTOR: &str = "a.post-tag.job-link.no-tag-menu";

const DESCRIPTION_HEADING: &str = "Job description";

/// Fields extracted from a job detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetail {
    /// Job title
    pub position: String,

    /// Hiring company
    pub company: String,

    /// Technology tags in document order, duplicates preserved
    pub tags: Vec<String>,

    /// Description block with all markup stripped
    pub description: String,
}

/// Extracts job detail URLs from a search results page
///
/// Links are returned in document order. Relative hrefs are resolved against
/// `base_url`; links that do not resolve to an HTTP(S) URL are dropped. An
/// empty result is a valid outcome (no jobs listed).
///
/// # Example
///
/// ```
/// use job_sift::crawler::extract_job_urls;
/// use url::Url;
///
/// let html = r#"<div class="js-search-results"><div class="listResults">
///     <div class="job-details__spaced"><a class="job-link" href="/jobs/1">One</a></div>
/// </div></div>"#;
/// let base = Url::parse("https://example.com/jobs?q=rust").unwrap();
/// assert_eq!(extract_job_urls(html, &base), vec!["https://example.com/jobs/1"]);
/// ```
pub fn extract_job_urls(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(JOB_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| {
            let resolved = resolve_link(href, base_url);
            if resolved.is_none() {
                tracing::debug!("Skipping unresolvable job link: {}", href);
            }
            resolved
        })
        .collect()
}

/// Extracts the job fields from a detail page
///
/// # Returns
///
/// * `Ok(JobDetail)` - All structural fields were found
/// * `Err(ParseError::MissingField)` - Title, company or description block is absent
///
/// A page without any tags is not an error; it simply cannot match.
pub fn extract_detail(html: &str) -> Result<JobDetail, ParseError> {
    let document = Html::parse_document(html);

    let position = first_text(&document, POSITION_SELECTOR)
        .ok_or(ParseError::MissingField { field: "position" })?;

    let company = first_text(&document, COMPANY_SELECTOR)
        .ok_or(ParseError::MissingField { field: "company" })?;

    let tags = extract_tags(&document);

    let description = extract_description(&document)
        .ok_or(ParseError::MissingField { field: "description" })?;

    Ok(JobDetail {
        position,
        company,
        tags,
        description,
    })
}

/// Returns the trimmed text of the first element matching `css`
fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects every tag link's text in document order
///
/// Each tag is trimmed and empty tags are dropped; duplicates are kept.
fn extract_tags(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(TAG_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Finds the `div` following the "Job description" heading and strips its markup
fn extract_description(document: &Html) -> Option<String> {
    let heading_selector = Selector::parse("h2").ok()?;

    let heading = document
        .select(&heading_selector)
        .find(|h2| h2.text().collect::<String>().trim() == DESCRIPTION_HEADING)?;

    let block = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "div")?;

    Some(strip_markup(block))
}

/// Flattens an element subtree to its text content
fn strip_markup(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
