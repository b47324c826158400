//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a single crawl run:
//! - Building the search URL from the query tags
//! - Fetching the search page and fanning out to every job listing
//! - Parsing and matching each listing as its fetch completes
//! - Deciding, once all fetches have drained, whether to send the report

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::matcher::match_listing;
use crate::crawler::parser::{extract_detail, extract_job_urls};
use crate::crawler::scheduler::{CompletedFetch, Scheduler};
use crate::output::{build_sink, notification_subject, render_report, CrawlStatistics, NotificationSink};
use crate::query::{build_search_url, QueryTagSet};
use crate::state::{CrawlRunContext, JobRecord, RunState};
use crate::SiftError;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// What a finished crawl run produced
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Terminal state of the run (`Notified` or `Skipped`)
    pub state: RunState,

    /// Matched records in the order they were found; empty when aborted
    pub records: Vec<JobRecord>,

    /// Whether the sink accepted the report (false when nothing was sent)
    pub delivered: bool,

    /// Counters collected during the run
    pub statistics: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn NotificationSink>,
    search_url: Url,
    send_to: String,
    max_concurrent: usize,
    context: CrawlRunContext,
    statistics: CrawlStatistics,
}

impl Coordinator {
    /// Creates a new coordinator for one run
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `query` - Normalized query tags for this run
    /// * `fetcher` - Page fetcher used for every request
    /// * `sink` - Where the report goes if anything matched
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SiftError)` - The configured search URL is invalid
    pub fn new(
        config: &Config,
        query: QueryTagSet,
        fetcher: Arc<dyn PageFetcher>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, SiftError> {
        let base = Url::parse(&config.crawler.search_url)?;
        let search_url = build_search_url(&base, &query);

        Ok(Self {
            fetcher,
            sink,
            search_url,
            send_to: config.notification.send_to.clone(),
            max_concurrent: config.crawler.max_concurrent_pages_open as usize,
            context: CrawlRunContext::new(query),
            statistics: CrawlStatistics::new(),
        })
    }

    /// The URL the crawl starts from
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    /// Runs the crawl to completion
    pub async fn run(self) -> Result<CrawlOutcome, SiftError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the crawl until it completes or `shutdown` resolves
    ///
    /// If `shutdown` wins, outstanding fetches are aborted and the run ends
    /// in `Skipped` without notification: partial results are discarded.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<CrawlOutcome, SiftError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            "Starting crawl for query tags [{}]",
            self.context.query()
        );

        let mut scheduler = Scheduler::new(Arc::clone(&self.fetcher), self.max_concurrent);

        let aborted = tokio::select! {
            _ = self.crawl(&mut scheduler) => false,
            _ = shutdown => true,
        };

        if aborted {
            tracing::warn!(
                "Crawl aborted with {} fetches in flight; discarding {} partial matches",
                scheduler.in_flight(),
                self.context.store().len()
            );
            scheduler.shutdown();
            self.context.transition(RunState::Skipped)?;

            let mut outcome = self.into_outcome(false);
            outcome.records.clear();
            return Ok(outcome);
        }

        self.finish().await
    }

    /// Fetches the search page, fans out to every listing and drains the results
    async fn crawl(&mut self, scheduler: &mut Scheduler) {
        tracing::info!("Fetching search page: {}", self.search_url);

        let (page_url, body) = match self.fetcher.fetch(&self.search_url).await {
            FetchResult::Success { final_url, body, .. } => {
                let page_url = Url::parse(&final_url).unwrap_or_else(|_| self.search_url.clone());
                (page_url, body)
            }
            other => {
                tracing::warn!("Failed to fetch search page {}: {:?}", self.search_url, other);
                return;
            }
        };

        let job_urls = extract_job_urls(&body, &page_url);
        self.statistics.job_links_found = job_urls.len() as u64;
        tracing::info!("Found {} job listings on search page", job_urls.len());

        for link in job_urls {
            match Url::parse(&link) {
                Ok(url) => scheduler.schedule(url),
                Err(e) => tracing::debug!("Failed to parse job URL {}: {}", link, e),
            }
        }

        while let Some(completed) = scheduler.next_completed().await {
            self.handle_detail(completed);
        }

        tracing::info!(
            "All {} job page fetches drained",
            scheduler.scheduled()
        );
    }

    /// Parses and matches one finished detail page
    ///
    /// Failures are confined to the page: it is logged, counted and skipped.
    fn handle_detail(&mut self, completed: CompletedFetch) {
        let CompletedFetch { url, result } = completed;

        let (final_url, body) = match result {
            FetchResult::Success { final_url, body, .. } => (final_url, body),
            other => {
                self.statistics.fetch_failures += 1;
                tracing::warn!("Failed to fetch job page {}: {:?}", url, other);
                return;
            }
        };
        self.statistics.pages_fetched += 1;

        let detail = match extract_detail(&body) {
            Ok(detail) => detail,
            Err(e) => {
                self.statistics.parse_failures += 1;
                tracing::warn!("Skipping job page {}: {}", final_url, e);
                return;
            }
        };

        let record = match_listing(detail, self.context.query(), &final_url);
        if let Some(record) = record {
            if self.context.record_match(record) {
                self.statistics.matches += 1;
            }
        }
    }

    /// Moves the run to its terminal state, sending the report if anything matched
    async fn finish(mut self) -> Result<CrawlOutcome, SiftError> {
        self.context.transition(RunState::Completing)?;

        if self.context.store().is_empty() {
            tracing::info!("No matching jobs found; skipping notification");
            self.context.transition(RunState::Skipped)?;
            return Ok(self.into_outcome(false));
        }

        let report = render_report(self.context.store().records());
        let subject = notification_subject(self.context.query());

        tracing::info!(
            "Sending report of {} matched jobs to {}",
            self.context.store().len(),
            self.send_to
        );

        let delivered = match self.sink.send(&self.send_to, &subject, &report).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to deliver report: {}", e);
                false
            }
        };

        self.context.transition(RunState::Notified)?;
        Ok(self.into_outcome(delivered))
    }

    fn into_outcome(self, delivered: bool) -> CrawlOutcome {
        let state = self.context.state();
        tracing::info!("Crawl run finished in state {}", state);

        CrawlOutcome {
            state,
            records: self.context.into_store().into_records(),
            delivered,
            statistics: self.statistics,
        }
    }
}

/// Runs a complete crawl with the production fetcher and the configured sink
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `query` - Normalized query tags
/// * `sink` - Overrides the configured sink when given
/// * `shutdown` - Resolves when the run should be aborted
///
/// # Example
///
/// ```no_run
/// use job_sift::config::load_config;
/// use job_sift::crawler::run_crawl;
/// use job_sift::query::normalize;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let query = normalize(Some("rust, go"))?;
/// let outcome = run_crawl(&config, query, None, std::future::pending()).await?;
/// println!("{} matches", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<F>(
    config: &Config,
    query: QueryTagSet,
    sink: Option<Arc<dyn NotificationSink>>,
    shutdown: F,
) -> Result<CrawlOutcome, SiftError>
where
    F: Future<Output = ()>,
{
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)?;

    let sink = match sink {
        Some(sink) => sink,
        None => build_sink(&config.notification, &config.user_agent)?,
    };

    let coordinator = Coordinator::new(config, query, Arc::new(fetcher), sink)?;
    coordinator.run_until(shutdown).await
}
