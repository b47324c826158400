//! Tag intersection between a listing and the query

use crate::crawler::parser::JobDetail;
use crate::query::QueryTagSet;
use crate::state::JobRecord;

/// Returns the page tags that also appear in the query
///
/// Comparison is exact string equality; no case folding or trimming happens
/// here. Each matching tag appears once, in the order it first occurs on the
/// page. An empty result means the listing does not match.
///
/// # Example
///
/// ```
/// use job_sift::crawler::match_tags;
/// use job_sift::query::normalize;
///
/// let query = normalize(Some("python+django")).unwrap();
/// let page = vec!["python".to_string(), "flask".to_string()];
/// assert_eq!(match_tags(&page, &query), vec!["python"]);
/// ```
pub fn match_tags(tags: &[String], query: &QueryTagSet) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();

    for tag in tags {
        if query.contains(tag) && !matched.contains(tag) {
            matched.push(tag.clone());
        }
    }

    matched
}

/// Matches a parsed listing against the query and builds its record
///
/// Returns `None` when no tag matches. On a match an info event names the
/// matched tags and the listing URL.
pub fn match_listing(detail: JobDetail, query: &QueryTagSet, source_url: &str) -> Option<JobRecord> {
    let matched = match_tags(&detail.tags, query);

    if matched.is_empty() {
        tracing::debug!("No matching tags in job page: {}", source_url);
        return None;
    }

    tracing::info!(
        matched_tags = %matched.join(","),
        url = %source_url,
        "Found matched tags in job page"
    );

    JobRecord::new(
        detail.company,
        detail.position,
        matched,
        detail.tags,
        detail.description,
        source_url.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::normalize;

    fn page(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    fn detail(tags: &[&str]) -> JobDetail {
        JobDetail {
            position: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            tags: page(tags),
            description: "Build services.".to_string(),
        }
    }

    #[test]
    fn test_partial_overlap() {
        let query = normalize(Some("python django")).unwrap();
        assert_eq!(match_tags(&page(&["python", "flask"]), &query), vec!["python"]);
    }

    #[test]
    fn test_no_overlap() {
        let query = normalize(Some("python django")).unwrap();
        assert!(match_tags(&page(&["ruby", "rails"]), &query).is_empty());
    }

    #[test]
    fn test_empty_page_tags() {
        let query = normalize(Some("rust")).unwrap();
        assert!(match_tags(&[], &query).is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        let query = normalize(Some("Rust")).unwrap();
        assert!(match_tags(&page(&["rust"]), &query).is_empty());
    }

    #[test]
    fn test_page_order_and_no_duplicates() {
        let query = normalize(Some("go rust python")).unwrap();
        let matched = match_tags(&page(&["rust", "java", "go", "rust"]), &query);
        assert_eq!(matched, vec!["rust", "go"]);
    }

    #[test]
    fn test_result_is_subset_of_both_sides() {
        let query = normalize(Some("a,b,c,d")).unwrap();
        let cases: Vec<Vec<String>> = vec![
            page(&[]),
            page(&["a"]),
            page(&["x", "y"]),
            page(&["d", "x", "a", "d"]),
            page(&["b", "c", "a", "d", "e"]),
        ];

        for tags in cases {
            let matched = match_tags(&tags, &query);
            for tag in &matched {
                assert!(tags.contains(tag));
                assert!(query.contains(tag));
            }
            let overlap = tags.iter().any(|t| query.contains(t));
            assert_eq!(matched.is_empty(), !overlap);
        }
    }

    #[test]
    fn test_match_listing_builds_record() {
        let query = normalize(Some("python+django")).unwrap();
        let record = match_listing(
            detail(&["python", "flask"]),
            &query,
            "https://example.com/jobs/1",
        )
        .unwrap();

        assert_eq!(record.matched_tags(), ["python"]);
        assert_eq!(record.all_tags(), ["python", "flask"]);
        assert_eq!(record.company(), "Acme");
        assert_eq!(record.source_url(), "https://example.com/jobs/1");
    }

    #[test]
    fn test_match_listing_without_overlap() {
        let query = normalize(Some("python+django")).unwrap();
        assert!(match_listing(detail(&["ruby", "rails"]), &query, "https://example.com/jobs/2").is_none());
        assert!(match_listing(detail(&[]), &query, "https://example.com/jobs/3").is_none());
    }
}
