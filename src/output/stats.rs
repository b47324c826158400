//! Counters describing what a crawl run did
//!
//! Kept by the coordinator while the run progresses and printed by the CLI
//! when it ends.

use crate::state::RunState;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Job links found on the search results page
    pub job_links_found: u64,

    /// Detail pages fetched successfully
    pub pages_fetched: u64,

    /// Detail pages that could not be fetched
    pub fetch_failures: u64,

    /// Detail pages skipped because a required field was missing
    pub parse_failures: u64,

    /// Listings whose tags matched the query
    pub matches: u64,
}

impl CrawlStatistics {
    /// Creates empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of detail pages that produced no usable listing
    pub fn pages_skipped(&self) -> u64 {
        self.fetch_failures + self.parse_failures
    }

    /// Returns the share of fetched pages that matched, as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            return 0.0;
        }
        (self.matches as f64 / self.pages_fetched as f64) * 100.0
    }
}

/// Formats statistics for display
pub fn format_statistics(stats: &CrawlStatistics, state: RunState) -> String {
    let mut out = String::new();

    out.push_str("=== job-sift Run Summary ===\n\n");
    out.push_str(&format!("Final state:      {}\n", state));
    out.push_str(&format!("Job links found:  {}\n", stats.job_links_found));
    out.push_str(&format!("Pages fetched:    {}\n", stats.pages_fetched));
    out.push_str(&format!("Fetch failures:   {}\n", stats.fetch_failures));
    out.push_str(&format!("Parse failures:   {}\n", stats.parse_failures));
    out.push_str(&format!(
        "Matches:          {} ({:.2}%)\n",
        stats.matches,
        stats.match_rate()
    ));

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics, state: RunState) {
    print!("{}", format_statistics(stats, state));
}
