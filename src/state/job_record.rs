//! Matched job records and the per-run store that accumulates them

/// A job listing whose tags matched the query
///
/// `matched_tags` is never empty and every entry also appears in `all_tags`.
/// [`JobRecord::new`] is the only constructor and enforces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    company: String,
    position: String,
    matched_tags: Vec<String>,
    all_tags: Vec<String>,
    description: String,
    source_url: String,
}

impl JobRecord {
    /// Creates a record, or `None` if `matched_tags` is empty or not a subset of `all_tags`
    pub fn new(
        company: String,
        position: String,
        matched_tags: Vec<String>,
        all_tags: Vec<String>,
        description: String,
        source_url: String,
    ) -> Option<Self> {
        if matched_tags.is_empty() {
            return None;
        }

        if !matched_tags.iter().all(|tag| all_tags.contains(tag)) {
            return None;
        }

        Some(Self {
            company,
            position,
            matched_tags,
            all_tags,
            description,
            source_url,
        })
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn matched_tags(&self) -> &[String] {
        &self.matched_tags
    }

    pub fn all_tags(&self) -> &[String] {
        &self.all_tags
    }

    /// Plain-text description, markup already stripped
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// Append-only, ordered collection of matches for one crawl run
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<JobRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the end of the store
    pub fn push(&mut self, record: JobRecord) {
        self.records.push(record);
    }

    /// Records in the order they were appended
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the store, returning its records
    pub fn into_records(self) -> Vec<JobRecord> {
        self.records
    }
}
