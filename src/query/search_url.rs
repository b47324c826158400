use crate::query::QueryTagSet;
use url::Url;

/// Name of the query parameter carrying the search tags
const QUERY_PARAM: &str = "q";

/// Builds the search results URL for a set of query tags
///
/// The tags are joined by spaces and appended as a form-encoded `q`
/// parameter, so `["python", "django"]` becomes `q=python+django`. Query
/// pairs already present on the base URL are kept.
///
/// # Example
///
/// ```
/// use job_sift::query::{build_search_url, normalize};
/// use url::Url;
///
/// let base = Url::parse("https://stackoverflow.com/jobs?sort=i").unwrap();
/// let tags = normalize(Some("python, django")).unwrap();
/// let url = build_search_url(&base, &tags);
/// assert_eq!(url.as_str(), "https://stackoverflow.com/jobs?sort=i&q=python+django");
/// ```
pub fn build_search_url(base: &Url, tags: &QueryTagSet) -> Url {
    let mut url = base.clone();

    if tags.is_empty() {
        return url;
    }

    let joined = tags.tags().join(" ");
    url.query_pairs_mut().append_pair(QUERY_PARAM, &joined);
    url
}
