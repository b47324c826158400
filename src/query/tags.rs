//! Query tag normalization
//!
//! Raw input such as `"go, rust python"` or `"python+django"` is split into
//! an ordered list of tags. Commas, whitespace and `+` all act as separators.

use crate::QueryError;
use std::fmt;

/// Ordered, non-empty sequence of query tags for one crawl run
///
/// Tags keep their original case and first-seen order; duplicates are not
/// removed. The set can only be built through [`normalize`] or
/// [`QueryTagSet::new`], both of which reject empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTagSet {
    tags: Vec<String>,
}

impl QueryTagSet {
    /// Builds a tag set from already-split tags
    ///
    /// Empty strings are dropped. Fails if nothing is left.
    pub fn new<I, S>(tags: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.is_empty())
            .collect();

        if tags.is_empty() {
            return Err(QueryError::InvalidQuery);
        }

        Ok(Self { tags })
    }

    /// Returns the tags in order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns true if `tag` is one of the query tags (exact match)
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl fmt::Display for QueryTagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.join(", "))
    }
}

/// Normalizes raw tag input into a [`QueryTagSet`]
///
/// # Arguments
///
/// * `raw` - The tag argument as supplied on the command line, if any
///
/// # Returns
///
/// * `Ok(QueryTagSet)` - At least one tag was found
/// * `Err(QueryError::InvalidQuery)` - Input was absent, empty, or only separators
///
/// # Example
///
/// ```
/// use job_sift::query::normalize;
///
/// let tags = normalize(Some("go, rust python")).unwrap();
/// assert_eq!(tags.tags(), ["go", "rust", "python"]);
/// ```
pub fn normalize(raw: Option<&str>) -> Result<QueryTagSet, QueryError> {
    let raw = raw.ok_or(QueryError::InvalidQuery)?;

    QueryTagSet::new(
        raw.split(|c: char| c == ',' || c == '+' || c.is_whitespace())
            .filter(|token| !token.is_empty()),
    )
}
